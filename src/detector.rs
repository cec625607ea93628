use serde_json::Value;

use crate::summary::ToolFamily;

/// Infer which tool produced a standalone harvest file from its shape.
pub fn detect_tool(harvested: &Value) -> Option<ToolFamily> {
    if harvested.pointer("/content/headers").is_some()
        || harvested.pointer("/content/scancode_version").is_some()
    {
        return Some(ToolFamily::ScanCode);
    }

    if ["monk", "nomos", "copyright"]
        .iter()
        .any(|agent| harvested.get(agent).is_some())
    {
        return Some(ToolFamily::Fossology);
    }

    None
}
