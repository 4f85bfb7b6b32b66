/// Answers whether a binary can be resolved on the execution path.
pub trait PrerequisiteProbe: Send + Sync {
    fn exists(&self, binary: &str) -> bool;
}

/// Resolves binaries against `PATH` using the `which` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathProbe;

impl PrerequisiteProbe for PathProbe {
    fn exists(&self, binary: &str) -> bool {
        match which::which(binary) {
            Ok(path) => {
                tracing::debug!(binary, path = %path.display(), "prerequisite found");
                true
            }
            Err(err) => {
                tracing::debug!(binary, %err, "prerequisite not found");
                false
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn finds_shell_and_rejects_nonsense() {
        assert!(PathProbe.exists("sh"));
        assert!(!PathProbe.exists("lintbridge-definitely-not-a-binary"));
    }
}
