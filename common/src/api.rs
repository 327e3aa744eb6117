use serde::{Deserialize, Serialize};

use crate::reportid::ReportId;

/// Body of the fire-and-forget delete POST. The remote script dispatches on
/// the `action` field; creates are posted as the report itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommand {
    pub action: String,
    pub id: ReportId,
}

impl DeleteCommand {
    #[must_use]
    pub fn new(id: ReportId) -> Self {
        Self {
            action: "delete".to_string(),
            id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_command_wire_shape() {
        let cmd = DeleteCommand::new(ReportId::try_from("x123").unwrap());
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"action":"delete","id":"x123"}"#);
    }
}
