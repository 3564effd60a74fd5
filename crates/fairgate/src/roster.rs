// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV roster loading for the CLI.
//!
//! The roster is an export from registration storage with the header
//! `id,name,email,booth_id`. The whole file must parse before any send
//! happens -- a half-read roster would silently drop attendees.

use std::path::Path;

use fairgate_core::{Attendee, FairgateError};

/// Reads all attendees from a CSV roster file.
pub fn load_roster(path: &Path) -> Result<Vec<Attendee>, FairgateError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        FairgateError::Config(format!("cannot open roster {}: {e}", path.display()))
    })?;

    let mut attendees = Vec::new();
    for (line, record) in reader.deserialize::<Attendee>().enumerate() {
        let attendee = record.map_err(|e| {
            FairgateError::Config(format!(
                "roster {} row {}: {e}",
                path.display(),
                line + 2 // header is row 1
            ))
        })?;
        attendees.push(attendee);
    }

    Ok(attendees)
}
