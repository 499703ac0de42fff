use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub id: String,
    pub name: String,
}

/// Current folder plus the breadcrumb trail from root (root itself excluded).
/// Navigation is the only mutator, so the trail always matches the ancestor
/// chain of the current folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Navigator {
    current_folder_id: Option<String>,
    breadcrumb: Vec<Crumb>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_folder_id(&self) -> Option<&str> {
        self.current_folder_id.as_deref()
    }

    pub fn breadcrumb(&self) -> &[Crumb] {
        &self.breadcrumb
    }

    pub fn depth(&self) -> usize {
        self.breadcrumb.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.breadcrumb.is_empty()
    }

    pub fn navigate_into(&mut self, folder_id: impl Into<String>, folder_name: impl Into<String>) {
        let id = folder_id.into();
        self.breadcrumb.push(Crumb {
            id: id.clone(),
            name: folder_name.into(),
        });
        self.current_folder_id = Some(id);
    }

    pub fn navigate_up(&mut self) -> bool {
        if self.breadcrumb.pop().is_none() {
            return false;
        }
        self.current_folder_id = self.breadcrumb.last().map(|crumb| crumb.id.clone());
        true
    }

    /// Index -1 resets to root; 0..depth truncates to that crumb. Anything
    /// else is a no-op.
    pub fn navigate_to_index(&mut self, index: isize) -> bool {
        if index == -1 {
            self.breadcrumb.clear();
            self.current_folder_id = None;
            return true;
        }
        if index < 0 || index as usize >= self.breadcrumb.len() {
            return false;
        }
        let index = index as usize;
        self.breadcrumb.truncate(index + 1);
        self.current_folder_id = Some(self.breadcrumb[index].id.clone());
        true
    }
}
