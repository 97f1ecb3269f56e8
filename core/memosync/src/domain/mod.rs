//! ドメイン型（値、enum、純粋なルール）

pub mod block;
pub mod command;
pub mod memo;
pub mod naming;
pub mod preview;
pub mod sync;

pub use block::AttachmentOutcome;
pub use command::Command;
pub use memo::{Memo, MemoPage, Resource};
pub use naming::BucketLayout;
pub use sync::{AttachmentPolicy, MemoFailure, SyncOptions, SyncReport};
