use super::*;

fn expense(id: &str, category: &str, amount: f64, date: &str) -> Expense {
    Expense {
        id: id.to_owned(),
        title: format!("{category} {id}"),
        amount,
        category: category.to_owned(),
        date: date.to_owned(),
        note: None,
        created_at: format!("{date}T12:00:00.000000Z"),
    }
}

fn ids(state: &ExpensesState) -> Vec<&str> {
    state.items.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn empty_state_totals_zero() {
    let state = ExpensesState::default();
    assert!(state.total().abs() < f64::EPSILON);
    assert!(state.by_category().is_empty());
}

#[test]
fn total_rounds_to_cents() {
    let state = ExpensesState {
        items: vec![expense("a", "Food", 0.1, "2024-01-01"), expense("b", "Food", 0.2, "2024-01-02")],
        ..ExpensesState::default()
    };
    assert!((state.total() - 0.3).abs() < f64::EPSILON);
}

#[test]
fn by_category_groups_and_sorts() {
    let state = ExpensesState {
        items: vec![
            expense("a", "Food", 10.0, "2024-01-01"),
            expense("b", "Rent", 500.0, "2024-01-01"),
            expense("c", "Food", 5.5, "2024-01-02"),
            expense("d", "Art", 15.5, "2024-01-03"),
        ],
        ..ExpensesState::default()
    };
    let totals = state.by_category();
    let names: Vec<&str> = totals.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(names, vec!["Rent", "Art", "Food"]);
    assert_eq!(totals[2].count, 2);
    assert!((totals[2].total - 15.5).abs() < f64::EPSILON);
}

#[test]
fn insert_keeps_newest_first() {
    let mut state = ExpensesState::default();
    state.insert(expense("mid", "Food", 1.0, "2024-02-01"));
    state.insert(expense("old", "Food", 1.0, "2024-01-01"));
    state.insert(expense("new", "Food", 1.0, "2024-03-01"));
    assert_eq!(ids(&state), vec!["new", "mid", "old"]);
}

#[test]
fn insert_same_date_goes_before_older_creation() {
    let mut state = ExpensesState::default();
    let mut first = expense("first", "Food", 1.0, "2024-02-01");
    first.created_at = "2024-02-01T08:00:00.000000Z".into();
    let mut second = expense("second", "Food", 1.0, "2024-02-01");
    second.created_at = "2024-02-01T09:00:00.000000Z".into();
    state.insert(first);
    state.insert(second);
    assert_eq!(ids(&state), vec!["second", "first"]);
}

#[test]
fn insert_orders_same_second_by_fraction() {
    let mut state = ExpensesState::default();
    let mut first = expense("first", "Food", 1.0, "2024-01-01");
    first.created_at = "2024-01-01T12:00:00.500000Z".into();
    let mut second = expense("second", "Food", 1.0, "2024-01-01");
    second.created_at = "2024-01-01T12:00:00.620000Z".into();

    state.insert(first);
    state.insert(second);
    assert_eq!(ids(&state), ["second", "first"]);
}

#[test]
fn insert_replaces_existing_id() {
    let mut state = ExpensesState::default();
    state.insert(expense("a", "Food", 1.0, "2024-02-01"));
    state.insert(expense("a", "Food", 9.0, "2024-02-01"));
    assert_eq!(state.items.len(), 1);
    assert!((state.items[0].amount - 9.0).abs() < f64::EPSILON);
}

#[test]
fn remove_reports_whether_found() {
    let mut state = ExpensesState::default();
    state.insert(expense("a", "Food", 1.0, "2024-02-01"));
    assert!(state.remove("a"));
    assert!(!state.remove("a"));
    assert!(state.items.is_empty());
}
