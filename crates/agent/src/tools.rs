//! Tool definitions published to the language model

use serde_json::{json, Value};

use doorman_core::{tool_names, ToolDefinition};

fn text_parameter(name: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            name: { "type": "string", "description": description }
        },
        "required": [name]
    })
}

fn no_parameters() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// Intake tools; `check_resident` is only offered when validating
pub fn intake_tool_definitions(validation_enabled: bool) -> Vec<ToolDefinition> {
    let mut tools = vec![
        ToolDefinition::new(
            tool_names::UPDATE_APARTMENT,
            "Record the apartment number the visitor is going to.",
            text_parameter("apartment", "Apartment number, e.g. 12B"),
        ),
        ToolDefinition::new(
            tool_names::UPDATE_RESIDENT,
            "Record the name of the resident the visitor wants to see.",
            text_parameter("name", "Resident's name"),
        ),
    ];

    if validation_enabled {
        tools.push(ToolDefinition::new(
            tool_names::CHECK_RESIDENT,
            "Check that the resident lives in the apartment. Call once both are recorded.",
            no_parameters(),
        ));
    }

    tools.extend([
        ToolDefinition::new(
            tool_names::UPDATE_VISITOR,
            "Record the visitor's own name.",
            text_parameter("name", "Visitor's name"),
        ),
        ToolDefinition::new(
            tool_names::UPDATE_REASON,
            "Record the reason for the visit.",
            text_parameter("reason", "Reason for the visit"),
        ),
        ToolDefinition::new(
            tool_names::CONFIRM_VISIT,
            "Confirm the visit once all details are collected and notify the building admin.",
            no_parameters(),
        ),
    ]);

    tools
}
