use crate::coordinator::CoordinatorSnapshot;

fn control(label: &str, disabled: bool) -> String {
    if disabled {
        format!("[{}] (disabled)", label)
    } else {
        format!("[{}]", label)
    }
}

/// Renders the file manager view for the terminal.
pub fn render(snapshot: &CoordinatorSnapshot, username: &str) -> String {
    let mut lines = vec![
        "File Manager".to_string(),
        format!("Authenticated as {}", username),
        String::new(),
    ];

    if snapshot.listing.is_empty() {
        lines.push("No files found.".to_string());
    } else {
        for entry in &snapshot.listing {
            let deleting = snapshot.status.is_deleting(&entry.path);
            let label = if deleting { "Deleting..." } else { "Delete" };
            lines.push(format!(
                "  {} ({}) {}",
                entry.name,
                entry.path,
                control(label, deleting)
            ));
        }
    }

    lines.push(String::new());
    let label = if snapshot.status.is_wiping() {
        "Deleting..."
    } else {
        "Wipe All App Data"
    };
    lines.push(control(label, snapshot.is_busy() || snapshot.listing.is_empty()));

    lines.join("\n")
}
