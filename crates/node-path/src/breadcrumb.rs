//! Breadcrumb reconstruction from a browse path.

use serde::{Deserialize, Serialize};

use crate::{Mode, decode, encode};

/// One step of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub name: String,
    pub path: String,
}

impl Crumb {
    fn new(name: impl Into<String>, path: String) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }
}

/// Names used for the category crumbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrumbLabels {
    pub root: String,
    pub all_notes: String,
    pub notebooks: String,
    pub tags: String,
    pub saved_searches: String,
    pub search_results: String,
}

impl Default for CrumbLabels {
    fn default() -> Self {
        Self {
            root: "Evernote".to_string(),
            all_notes: "All notes".to_string(),
            notebooks: "Notebooks".to_string(),
            tags: "Tags".to_string(),
            saved_searches: "Saved searchs".to_string(),
            search_results: "Search results".to_string(),
        }
    }
}

/// Build the breadcrumb trail of a path.
///
/// The first crumb always points at the root. Each segment then adds zero,
/// one or two crumbs depending on its mode, and the trail used to prefix the
/// next crumbs is the path of the last crumb emitted, so a category segment
/// with no id (`tags:`) still links to the right place.
pub fn build_breadcrumb(path: &str, labels: &CrumbLabels) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb::new(&labels.root, encode(&Mode::Root, "", "", ""))];
    let mut trail = String::new();

    for segment in path.split('/') {
        let node = decode(segment);
        let mode = &node.mode;
        match mode {
            Mode::All => {
                crumbs.push(Crumb::new(&labels.all_notes, encode(mode, "", "", "")));
            }
            Mode::Tags | Mode::Searchs => {
                let label = if *mode == Mode::Tags {
                    &labels.tags
                } else {
                    &labels.saved_searches
                };
                crumbs.push(Crumb::new(label, encode(mode, "", "", &trail)));
                if !node.name.is_empty() {
                    crumbs.push(Crumb::new(
                        &node.name,
                        encode(mode, &node.id, &node.name, &trail),
                    ));
                }
            }
            Mode::Notebooks => {
                crumbs.push(Crumb::new(&labels.notebooks, encode(mode, "", "", &trail)));
            }
            Mode::Stack => {
                crumbs.push(Crumb::new(&node.id, encode(mode, &node.id, "", &trail)));
            }
            Mode::Notebook | Mode::Note => {
                if !node.name.is_empty() {
                    crumbs.push(Crumb::new(
                        &node.name,
                        encode(mode, &node.id, &node.name, &trail),
                    ));
                }
            }
            Mode::MySearch => {
                crumbs.push(Crumb::new(
                    &labels.search_results,
                    encode(mode, &node.id, "", &trail),
                ));
            }
            Mode::Root | Mode::Other(_) => {}
        }
        if let Some(last) = crumbs.last() {
            trail.clone_from(&last.path);
        }
    }

    crumbs
}
