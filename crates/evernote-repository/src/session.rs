//! Per-user browse state kept by the host between listing requests.

/// Browse state the host keeps between requests of one user.
///
/// Paging requests (page > 1) do not repeat the path, so the last browsed
/// path is remembered here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseSession {
    last_path: Option<String>,
}

impl BrowseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path to list for `page`, remembering it for the following pages.
    pub fn resolve(&mut self, path: &str, page: u32) -> String {
        if page > 1 {
            if let Some(last) = &self.last_path {
                return last.clone();
            }
        }
        let path = if path.is_empty() { "all:" } else { path };
        self.last_path = Some(path.to_string());
        path.to_string()
    }

    pub fn last_path(&self) -> Option<&str> {
        self.last_path.as_deref()
    }
}
