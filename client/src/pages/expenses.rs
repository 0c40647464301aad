//! Authenticated ledger page: list, totals, add and delete.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads the shared `AuthState`/`ExpensesState` contexts provided by `App`.
//! Data loads once auth resolves to a user; unauthenticated visitors are
//! sent back to the landing page.

#[cfg(test)]
#[path = "expenses_test.rs"]
mod expenses_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::types::ExpenseDraft;
use crate::state::auth::AuthState;
use crate::state::expenses::ExpensesState;
use crate::util::auth::install_unauth_redirect;
use crate::util::money::format_amount;

pub(crate) const MSG_TITLE_MISSING: &str = "Enter a title.";
pub(crate) const MSG_CATEGORY_MISSING: &str = "Enter a category.";
pub(crate) const MSG_AMOUNT_INVALID: &str = "Enter a positive amount.";
pub(crate) const MSG_DATE_INVALID: &str = "Date must be YYYY-MM-DD.";

/// Shape check for `YYYY-MM-DD`; the server rejects impossible dates.
pub(crate) fn is_iso_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Turn raw form values into a request body. Blank date/note are omitted.
pub(crate) fn parse_expense_form(
    title: &str,
    amount: &str,
    category: &str,
    date: &str,
    note: &str,
) -> Result<ExpenseDraft, &'static str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(MSG_TITLE_MISSING);
    }
    let amount = amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or(MSG_AMOUNT_INVALID)?;
    let category = category.trim();
    if category.is_empty() {
        return Err(MSG_CATEGORY_MISSING);
    }
    let date = Some(date.trim()).filter(|d| !d.is_empty());
    if date.is_some_and(|d| !is_iso_date(d)) {
        return Err(MSG_DATE_INVALID);
    }
    let note = Some(note.trim()).filter(|n| !n.is_empty());

    Ok(ExpenseDraft {
        title: title.to_owned(),
        amount,
        category: category.to_owned(),
        date: date.map(str::to_owned),
        note: note.map(str::to_owned),
    })
}

#[component]
pub fn ExpensesPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let expenses = expect_context::<RwSignal<ExpensesState>>();
    install_unauth_redirect(auth, use_navigate());

    // Load once a user is known.
    Effect::new(move || {
        if auth.get().user.is_none() {
            return;
        }
        expenses.update(|s| {
            s.loading = true;
            s.error = None;
        });
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::list_expenses().await {
                Ok(items) => expenses.set(ExpensesState { items, loading: false, error: None }),
                Err(e) => expenses.update(|s| {
                    s.loading = false;
                    s.error = Some(e);
                }),
            }
        });
    });

    let title = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let date = RwSignal::new(String::new());
    let note = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let draft = match parse_expense_form(&title.get(), &amount.get(), &category.get(), &date.get(), &note.get()) {
            Ok(draft) => draft,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::create_expense(&draft).await {
                Ok(created) => {
                    expenses.update(|s| s.insert(created));
                    title.set(String::new());
                    amount.set(String::new());
                    note.set(String::new());
                }
                Err(e) => info.set(format!("Could not add expense: {e}")),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = draft;
    };

    let on_delete = move |id: String| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_expense(&id).await {
                Ok(()) => {
                    expenses.update(|s| {
                        s.remove(&id);
                    });
                }
                Err(e) => info.set(format!("Could not delete expense: {e}")),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = id;
    };

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            crate::net::api::logout().await;
            auth.set(AuthState::default());
            expenses.set(ExpensesState::default());
        });
    };

    view! {
        <div class="expenses-page">
            <header class="expenses-page__header">
                <h1>"Expenses"</h1>
                <span class="expenses-page__user">
                    {move || auth.get().user.map(|u| u.name).unwrap_or_default()}
                </span>
                <button class="auth-button" on:click=on_logout>"Log Out"</button>
            </header>

            <section class="expenses-summary">
                <p class="expenses-summary__total">
                    "Total: " {move || format_amount(expenses.get().total())}
                </p>
                <ul class="expenses-summary__categories">
                    <For
                        each=move || expenses.get().by_category()
                        key=|c| c.category.clone()
                        children=move |c| {
                            view! {
                                <li>
                                    <span>{c.category}</span>
                                    " "
                                    <span>{format_amount(c.total)}</span>
                                    " (" {c.count} ")"
                                </li>
                            }
                        }
                    />
                </ul>
            </section>

            <form class="expense-form" on:submit=on_add>
                <input
                    class="expense-input"
                    type="text"
                    placeholder="Title"
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev))
                />
                <input
                    class="expense-input"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="Amount"
                    prop:value=move || amount.get()
                    on:input=move |ev| amount.set(event_target_value(&ev))
                />
                <input
                    class="expense-input"
                    type="text"
                    placeholder="Category"
                    prop:value=move || category.get()
                    on:input=move |ev| category.set(event_target_value(&ev))
                />
                <input
                    class="expense-input"
                    type="date"
                    prop:value=move || date.get()
                    on:input=move |ev| date.set(event_target_value(&ev))
                />
                <input
                    class="expense-input"
                    type="text"
                    placeholder="Note (optional)"
                    prop:value=move || note.get()
                    on:input=move |ev| note.set(event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    "Add Expense"
                </button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="auth-message">{move || info.get()}</p>
            </Show>
            <Show when=move || expenses.get().error.is_some()>
                <p class="auth-message">{move || expenses.get().error.unwrap_or_default()}</p>
            </Show>

            <table class="expenses-table">
                <thead>
                    <tr>
                        <th>"Date"</th>
                        <th>"Title"</th>
                        <th>"Category"</th>
                        <th>"Amount"</th>
                        <th>"Note"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || expenses.get().items
                        key=|e| e.id.clone()
                        children=move |e| {
                            let id = e.id.clone();
                            view! {
                                <tr>
                                    <td>{e.date}</td>
                                    <td>{e.title}</td>
                                    <td>{e.category}</td>
                                    <td class="expenses-table__amount">{format_amount(e.amount)}</td>
                                    <td>{e.note.unwrap_or_default()}</td>
                                    <td>
                                        <button
                                            class="expense-delete"
                                            on:click=move |_| on_delete(id.clone())
                                        >
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}
