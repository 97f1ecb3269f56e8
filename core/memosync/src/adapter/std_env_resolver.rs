//! 標準環境変数解決実装（std::env を委譲）

use crate::ports::outbound::EnvResolver;

#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

impl EnvResolver for StdEnvResolver {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// テスト用: 固定の変数表から引く EnvResolver
    #[derive(Default)]
    pub(crate) struct MapEnv(pub HashMap<String, String>);

    impl MapEnv {
        pub(crate) fn with(pairs: &[(&str, &str)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl EnvResolver for MapEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0.get(key).filter(|s| !s.is_empty()).cloned()
        }
    }

    #[test]
    fn test_resolve_home_dir_priority() {
        let env = MapEnv::with(&[("MEMOSYNC_HOME", "/m"), ("XDG_CONFIG_HOME", "/x"), ("HOME", "/h")]);
        assert_eq!(env.resolve_home_dir().unwrap(), PathBuf::from("/m"));

        let env = MapEnv::with(&[("XDG_CONFIG_HOME", "/x"), ("HOME", "/h")]);
        assert_eq!(env.resolve_home_dir().unwrap(), PathBuf::from("/x/memosync"));

        let env = MapEnv::with(&[("MEMOSYNC_HOME", ""), ("HOME", "/h")]);
        assert_eq!(env.resolve_home_dir().unwrap(), PathBuf::from("/h/.config/memosync"));
    }

    #[test]
    fn test_resolve_home_dir_without_home_fails() {
        let env = MapEnv::default();
        assert!(env.resolve_home_dir().is_err());
    }
}
