//! Conversational intents understood by the intake controller
//!
//! The engine either sends an [`Intent`] directly or forwards the tool call
//! the language model produced; [`Intent::from_tool_call`] maps tool names
//! to intents so no name-based method lookup is needed downstream.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm_types::ToolCall;
use crate::visitor::VisitorField;

/// Tool names exposed to the language model
pub mod tool_names {
    pub const UPDATE_APARTMENT: &str = "update_apartment";
    pub const UPDATE_RESIDENT: &str = "update_resident";
    pub const CHECK_RESIDENT: &str = "check_resident";
    pub const UPDATE_VISITOR: &str = "update_visitor";
    pub const UPDATE_REASON: &str = "update_reason";
    pub const CONFIRM_VISIT: &str = "confirm_visit";
}

/// A recognized conversational action with its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    SetApartment { apartment: String },
    SetResident { name: String },
    CheckResident,
    SetVisitor { name: String },
    SetReason { reason: String },
    Confirm,
}

impl Intent {
    /// Tool name that produces this intent
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::SetApartment { .. } => tool_names::UPDATE_APARTMENT,
            Self::SetResident { .. } => tool_names::UPDATE_RESIDENT,
            Self::CheckResident => tool_names::CHECK_RESIDENT,
            Self::SetVisitor { .. } => tool_names::UPDATE_VISITOR,
            Self::SetReason { .. } => tool_names::UPDATE_REASON,
            Self::Confirm => tool_names::CONFIRM_VISIT,
        }
    }

    /// Field written by this intent, if any
    pub fn field(&self) -> Option<VisitorField> {
        match self {
            Self::SetApartment { .. } => Some(VisitorField::ApartmentNumber),
            Self::SetResident { .. } => Some(VisitorField::ResidentName),
            Self::SetVisitor { .. } => Some(VisitorField::VisitorName),
            Self::SetReason { .. } => Some(VisitorField::VisitReason),
            Self::CheckResident | Self::Confirm => None,
        }
    }

    /// Decode a model tool call
    pub fn from_tool_call(call: &ToolCall) -> Result<Self> {
        let required = |argument: &str| {
            call.text_argument(argument)
                .ok_or_else(|| Error::MissingArgument {
                    tool: call.name.clone(),
                    argument: argument.to_string(),
                })
        };

        match call.name.as_str() {
            tool_names::UPDATE_APARTMENT => Ok(Self::SetApartment {
                apartment: required("apartment")?,
            }),
            tool_names::UPDATE_RESIDENT => Ok(Self::SetResident {
                name: required("name")?,
            }),
            tool_names::CHECK_RESIDENT => Ok(Self::CheckResident),
            tool_names::UPDATE_VISITOR => Ok(Self::SetVisitor {
                name: required("name")?,
            }),
            tool_names::UPDATE_REASON => Ok(Self::SetReason {
                reason: required("reason")?,
            }),
            tool_names::CONFIRM_VISIT => Ok(Self::Confirm),
            other => Err(Error::InvalidToolCall(other.to_string())),
        }
    }
}
