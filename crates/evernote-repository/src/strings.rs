//! English language strings.

use node_path::CrumbLabels;

const EN: &[(&str, &str)] = &[
    ("allnotes", "All notes"),
    ("cannotdownload", "Cannot download this file"),
    ("configplugin", "Evernote configuration"),
    ("evernote", "Evernote"),
    ("evernote:view", "View Evernote repository"),
    ("key", "Consumer key"),
    ("login", "Login"),
    ("lostsource", "Error, source missing."),
    ("nopermissiontoaccessnotes", "You do not have the permission to access these notes."),
    ("notebooks", "Notebooks"),
    ("pluginname", "Evernote"),
    ("pluginname_help", "Repository on Evernote"),
    ("referencedetails", "{name} ({fullname})"),
    ("requesttokenerror", "Could not get a request token from Evernote."),
    ("savedsearchs", "Saved searchs"),
    ("searchresults", "Search results"),
    ("secret", "Consumer secret"),
    ("sharefailed", "Error while sharing the note to get a download URL"),
    ("tags", "Tags"),
    ("usedevapi", "Use the development API"),
    ("usedevapi_info", "Connects to sandbox.evernote.com instead of www.evernote.com."),
];

/// Look up a string, returning the identifier itself when it is unknown.
pub fn get(id: &str) -> &str {
    EN.iter()
        .find(|(key, _)| *key == id)
        .map(|(_, value)| *value)
        .unwrap_or(id)
}

/// Look up a string and substitute `{placeholder}` values.
pub fn format(id: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(get(id).to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}

/// Labels for the breadcrumb categories.
pub fn crumb_labels() -> CrumbLabels {
    CrumbLabels {
        root: get("evernote").to_string(),
        all_notes: get("allnotes").to_string(),
        notebooks: get("notebooks").to_string(),
        tags: get("tags").to_string(),
        saved_searches: get("savedsearchs").to_string(),
        search_results: get("searchresults").to_string(),
    }
}
