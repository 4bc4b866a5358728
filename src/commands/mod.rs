pub mod aifaq;
pub mod autofy;
pub mod fy;
pub mod gemini;
pub mod guess;

use crate::{Data, Error};

/// Every plugin command, in registration order.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        aifaq::aifaq(),
        fy::fy(),
        guess::guess(),
        gemini::gemini(),
        autofy::autofy(),
    ]
}
