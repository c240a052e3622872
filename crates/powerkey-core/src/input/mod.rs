// Powerkey Input Layer
// Raw event records and the device reader

mod device;
mod event;

pub use device::EventReader;
pub use event::{InputEvent, KeyState, Trigger, EV_KEY, KEY_POWER, RECORD_SIZE};
