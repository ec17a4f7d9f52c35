/// Compose a flash message HTML snippet for known status or error codes
/// carried across redirects.
pub fn compose_flash_message(status: Option<&str>, error: Option<&str>) -> String {
    if let Some(status) = status {
        let message = match status {
            "submitted" => "Chore submitted! Waiting for a parent to review it.",
            "submitted_many" => "Chores submitted! Waiting for a parent to review them.",
            "chore_created" => "Chore type created.",
            "chore_updated" => "Chore type updated.",
            "chore_activated" => "Chore type activated.",
            "chore_deactivated" => "Chore type deactivated.",
            "approved" => "Chore approved and added to the ledger.",
            "rejected" => "Chore rejected.",
            "fine_added" => "Fine added.",
            "payment_added" => "Payment recorded.",
            _ => "",
        };

        if !message.is_empty() {
            return format!(r#"<div class="flash success">{message}</div>"#);
        }
    }

    if let Some(error) = error {
        let message = match error {
            "parent_required" => "Access denied. Parent account required.",
            "child_required" => "Access denied. Child account required.",
            "missing_fields" => "Please fill in all required fields.",
            "invalid_value" => "Chore value must be a number above zero.",
            "invalid_limit" => "Daily limits must be whole numbers of zero or more.",
            "invalid_count" => "Submission count must be at least 1.",
            "invalid_amount" => "Amount must be a number above zero.",
            "missing_description" => "Please describe the fine.",
            "limit_reached" => "Daily limit already reached for that chore.",
            "already_reviewed" => {
                "That submission was already reviewed. Refresh to see its current state."
            }
            "chore_missing" => "That chore type no longer exists.",
            "submission_missing" => "That submission no longer exists.",
            "child_missing" => "No child account found.",
            _ => "Something went wrong. Please check the server logs.",
        };

        return format!(r#"<div class="flash error">{message}</div>"#);
    }

    String::new()
}
