use crate::model::list::ItemRef;

/// What submitting the input line means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Blank input: drop the filter and any pending edit
    Clear,
    /// Filter expression (trigger character stripped)
    Filter(String),
    Add(String),
    /// Commit a pending edit
    Update(ItemRef, String),
}

/// Interpret a submitted input line. A pending edit wins over the filter
/// trigger, so an edited todo may start with the filter character.
pub fn interpret_input(input: &str, editing: Option<ItemRef>, filter_key: char) -> InputAction {
    let text = input.trim();
    if text.is_empty() {
        return InputAction::Clear;
    }
    if let Some(target) = editing {
        return InputAction::Update(target, text.to_string());
    }
    match text.strip_prefix(filter_key) {
        Some(expr) => InputAction::Filter(expr.to_string()),
        None => InputAction::Add(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_clears() {
        assert_eq!(interpret_input("   ", None, '?'), InputAction::Clear);
    }

    #[test]
    fn test_filter_trigger() {
        assert_eq!(
            interpret_input("?@home urgent", None, '?'),
            InputAction::Filter("@home urgent".into())
        );
        assert_eq!(
            interpret_input("/x", None, '/'),
            InputAction::Filter("x".into())
        );
        assert_eq!(interpret_input("?", None, '?'), InputAction::Filter(String::new()));
    }

    #[test]
    fn test_add_trims() {
        assert_eq!(
            interpret_input("  buy milk ", None, '?'),
            InputAction::Add("buy milk".into())
        );
    }

    #[test]
    fn test_edit_wins_over_filter() {
        let target = ItemRef {
            index: 2,
            generation: 5,
        };
        assert_eq!(
            interpret_input("?not a filter", Some(target), '?'),
            InputAction::Update(target, "?not a filter".into())
        );
    }
}
