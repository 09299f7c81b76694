//! Deploy summary printed after a successful run.

use chrono::NaiveDate;

use crate::config::EnvironmentConfig;

/// Compose the glyph-decorated summary announcing a finished deploy.
///
/// The date is a parameter so the message stays deterministic under test;
/// callers pass today's date.
pub fn deploy_message(config: &EnvironmentConfig, date: NaiveDate) -> String {
    format!(
        "🚀 NEW DEPLOY\n\
         \n\
         🕒 Date: {date}\n\
         🤖 Project: Moonium (Client)\n\
         🛢 Server: {server}\n\
         🎯 Target: https://{target}\n\
         🛠 Features: ToDo Write here",
        date = date.format("%d/%m/%Y"),
        server = config.display_name,
        target = config.remote_path,
    )
}
