/// Yes/no gate asked before destructive or bulk operations.
///
/// Declining is not an error: commands stop early and exit successfully.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every prompt (`--yes`, `--force`, `--silent`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("Continue?"));
    }

    #[test]
    fn test_closure_sees_prompt() {
        let prompts = Mutex::new(Vec::new());
        let gate = |prompt: &str| {
            prompts.lock().unwrap().push(prompt.to_string());
            false
        };

        assert!(!gate.confirm("Discard all changes?"));
        assert_eq!(prompts.lock().unwrap().as_slice(), ["Discard all changes?"]);
    }
}
