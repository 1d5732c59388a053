//! Discovery of the external programs playback and sharing rely on.

use std::path::PathBuf;

use serde::Serialize;

use crate::share::CLIPBOARD_TOOLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Player,
    Clipboard,
}

/// Availability of one external program.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub kind: ToolKind,
    pub available: bool,
    pub path: Option<PathBuf>,
}

fn check_tool(name: &str, kind: ToolKind) -> ToolInfo {
    let path = which::which(name).ok();
    ToolInfo {
        name: name.to_string(),
        kind,
        available: path.is_some(),
        path,
    }
}

/// Check the configured players followed by the known clipboard programs.
pub fn check_tools<I, N>(players: I) -> Vec<ToolInfo>
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    players
        .into_iter()
        .map(|name| check_tool(name.as_ref(), ToolKind::Player))
        .chain(
            CLIPBOARD_TOOLS
                .iter()
                .map(|(name, _)| check_tool(name, ToolKind::Clipboard)),
        )
        .collect()
}
