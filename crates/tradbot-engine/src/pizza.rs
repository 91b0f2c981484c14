//! The built-in pizza ordering dialog.
//!
//! ```text
//! start --size_*--> size --crust_*--> crust --topping_*--> topping --confirm_*--> done
//!   \_______________\________________\___________________\___cancel_dialog___/
//! ```

use crate::error::Result;
use crate::fsm::{DialogFlow, DialogState};
use crate::slots::Session;

pub const START: &str = "start";
pub const SIZE: &str = "size";
pub const CRUST: &str = "crust";
pub const TOPPING: &str = "topping";
pub const DONE: &str = "done";

/// Rendered in place of a slot the user never filled.
const UNSET: &str = "(not chosen)";

/// Build the pizza ordering flow.
pub fn flow() -> Result<DialogFlow> {
    DialogFlow::builder(START, DONE)
        .state(
            DialogState::new(START, enter_start)
                .on("size_small", SIZE)
                .on("size_medium", SIZE)
                .on("size_large", SIZE),
        )
        .state(
            DialogState::new(SIZE, enter_size)
                .on("crust_thin", CRUST)
                .on("crust_regular", CRUST)
                .on("crust_deep", CRUST),
        )
        .state(
            DialogState::new(CRUST, enter_crust)
                .on("topping_pepperoni", TOPPING)
                .on("topping_mushrooms", TOPPING)
                .on("topping_onions", TOPPING)
                .on("topping_olives", TOPPING),
        )
        .state(
            DialogState::new(TOPPING, enter_topping)
                .on("confirm_yes", DONE)
                .on("confirm_no", DONE),
        )
        .state(DialogState::new(DONE, enter_done))
        .universal("cancel_dialog", DONE)
        .build()
}

fn enter_start(_: &Session) -> String {
    "Let's order a pizza! What size would you like? (small/medium/large)\n\
     You can say 'cancel' anytime to stop."
        .to_owned()
}

fn enter_size(_: &Session) -> String {
    "Got it. What crust do you want? (thin/regular/deep-dish)".to_owned()
}

fn enter_crust(_: &Session) -> String {
    "Yum. Pick a topping: pepperoni, mushrooms, onions, or olives.".to_owned()
}

fn enter_topping(session: &Session) -> String {
    format!(
        "Order summary: {} pizza, {} crust, {}.\nConfirm? (yes/no)",
        session.get_or("size", UNSET),
        session.get_or("crust", UNSET),
        session.get_or("topping", UNSET),
    )
}

fn enter_done(session: &Session) -> String {
    match session.get("outcome") {
        None | Some("confirmed") => "Your pizza order is confirmed. Anything else?".to_owned(),
        Some(_) => "Okay, your pizza order has been cancelled. Anything else?".to_owned(),
    }
}
