//! Message processing: the TEA loop between `update` and the action runner

use docsite_net::{PageSource, SuggestionSource};
use tokio::sync::mpsc;

use crate::actions::{handle_action, Services, TimerSlots};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function, following up
/// messages until the chain ends
pub fn process_message<P, Q>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    services: &Services<P, Q>,
    timers: &mut TimerSlots,
) where
    P: PageSource + Sync + 'static,
    Q: SuggestionSource + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx, services, timers);
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
