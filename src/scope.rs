//! Scope aggregation across changed files.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::Config;
use crate::error::ScopeError;

impl Config {
    /// Returns the sorted, deduplicated scopes for `files`.
    ///
    /// Every module is tried against every file; a file may contribute
    /// several scopes. The first matcher error aborts the whole run.
    pub fn scopes_for_files<S: AsRef<str>>(
        &self,
        files: &[S],
    ) -> Result<Vec<String>, ScopeError> {
        let mut scopes = BTreeSet::new();

        for file in files {
            let file = file.as_ref();
            for module in &self.modules {
                scopes.extend(module.matches_file(file)?);
            }
        }

        debug!(files = files.len(), ?scopes, "Collected scopes");
        Ok(scopes.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Module;

    fn sample_config() -> Config {
        Config::new(vec![
            Module::named_glob("api", "src/api/**/*"),
            Module::named_glob("db", "src/db/**/*"),
            Module::regex(r"modules/(?P<scope>\w+)/.*"),
        ])
    }

    #[test]
    fn single_file_matches_one_module() {
        let scopes = sample_config()
            .scopes_for_files(&["src/api/handler.go"])
            .unwrap();
        assert_eq!(scopes, vec!["api"]);
    }

    #[test]
    fn multiple_files_same_module() {
        let scopes = sample_config()
            .scopes_for_files(&["src/api/handler.go", "src/api/model.go"])
            .unwrap();
        assert_eq!(scopes, vec!["api"]);
    }

    #[test]
    fn multiple_files_different_modules() {
        let scopes = sample_config()
            .scopes_for_files(&["src/db/query.go", "src/api/handler.go"])
            .unwrap();
        assert_eq!(scopes, vec!["api", "db"]);
    }

    #[test]
    fn mixed_glob_and_regex_matches() {
        let config = Config::new(vec![
            Module::named_glob("api", "src/api/**/*"),
            Module::regex(r"modules/(?P<scope>\w+)/.*"),
        ]);
        let scopes = config
            .scopes_for_files(&["src/api/h.go", "modules/cache/m.tf"])
            .unwrap();
        assert_eq!(scopes, vec!["api", "cache"]);
    }

    #[test]
    fn file_matching_several_modules_contributes_all() {
        let config = Config::new(vec![
            Module::named_glob("api", "src/api/**"),
            Module::named_glob("go", "**/*.go"),
        ]);
        let scopes = config.scopes_for_files(&["src/api/h.go"]).unwrap();
        assert_eq!(scopes, vec!["api", "go"]);
    }

    #[test]
    fn no_matches_is_empty() {
        let scopes = sample_config().scopes_for_files(&["README.md"]).unwrap();
        assert!(scopes.is_empty());
    }

    #[test]
    fn no_files_and_no_rules_is_empty() {
        let files: [&str; 0] = [];
        assert!(Config::default().scopes_for_files(&files).unwrap().is_empty());
    }

    #[test]
    fn matcher_error_aborts() {
        let config = Config::new(vec![
            Module::named_glob("api", "src/api/**/*"),
            Module::regex(r"(?P<scope_a>\w+)/(?P<scope_b>\w+)/"),
        ]);
        let err = config
            .scopes_for_files(&["README.md", "src/api/h.go"])
            .unwrap_err();
        assert!(matches!(err, ScopeError::AmbiguousCapture { .. }));
    }

    #[test]
    fn accepts_owned_paths() {
        let files = vec!["modules/auth/main.tf".to_string()];
        assert_eq!(sample_config().scopes_for_files(&files).unwrap(), vec!["auth"]);
    }

    // ── property tests ────────────────────────────────────────────

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_is_sorted_and_unique(
                files in proptest::collection::vec("(src/(api|db)|modules/[a-c]{1,3})/[a-z]{1,5}\\.go", 0..20),
            ) {
                let scopes = sample_config().scopes_for_files(&files).unwrap();
                prop_assert!(scopes.windows(2).all(|w| w[0] < w[1]));
            }

            #[test]
            fn order_of_files_does_not_matter(
                files in proptest::collection::vec("modules/[a-d]{1,2}/x\\.tf", 0..10),
            ) {
                let config = sample_config();
                let forward = config.scopes_for_files(&files).unwrap();
                let mut reversed = files.clone();
                reversed.reverse();
                let backward = config.scopes_for_files(&reversed).unwrap();
                prop_assert_eq!(forward, backward);
            }
        }
    }
}
