// Powerkey Input Layer - Event Records
// Decoding of kernel input_event records and trigger matching

use std::mem::size_of;

/// EV_KEY event type code from linux/input-event-codes.h
pub const EV_KEY: u16 = evdev::EventType::KEY.0;

/// KEY_POWER key code from linux/input-event-codes.h
pub const KEY_POWER: u16 = evdev::Key::KEY_POWER.code();

/// Size in bytes of one `struct input_event` as the kernel writes it.
pub const RECORD_SIZE: usize = size_of::<libc::input_event>();

// type, code and value sit after the timestamp, at the end of the record
const PAYLOAD_OFFSET: usize = RECORD_SIZE - 8;

/// Press state carried in the value field of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Release,
    Press,
    Repeat,
    Other(i32),
}

impl From<i32> for KeyState {
    fn from(value: i32) -> Self {
        match value {
            0 => KeyState::Release,
            1 => KeyState::Press,
            2 => KeyState::Repeat,
            v => KeyState::Other(v),
        }
    }
}

/// One input event read from the device.
///
/// The timestamp part of the record is not kept; only the fields
/// used for matching survive decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// Event category (EV_KEY = 0x01)
    pub event_type: u16,
    /// Key code
    pub code: u16,
    /// Event value (0=Release, 1=Press, 2=Repeat)
    pub value: i32,
}

impl InputEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    /// Build a key event for `code` with the given press state value.
    pub fn key(code: u16, value: i32) -> Self {
        Self::new(EV_KEY, code, value)
    }

    /// Decode one native-endian `struct input_event` record.
    pub fn from_record(record: &[u8; RECORD_SIZE]) -> Self {
        let p = &record[PAYLOAD_OFFSET..];
        Self {
            event_type: u16::from_ne_bytes([p[0], p[1]]),
            code: u16::from_ne_bytes([p[2], p[3]]),
            value: i32::from_ne_bytes([p[4], p[5], p[6], p[7]]),
        }
    }

    /// Encode as a record with a zeroed timestamp.
    pub fn to_record(&self) -> [u8; RECORD_SIZE] {
        let mut record = [0u8; RECORD_SIZE];
        let p = &mut record[PAYLOAD_OFFSET..];
        p[0..2].copy_from_slice(&self.event_type.to_ne_bytes());
        p[2..4].copy_from_slice(&self.code.to_ne_bytes());
        p[4..8].copy_from_slice(&self.value.to_ne_bytes());
        record
    }

    pub fn is_key_event(&self) -> bool {
        self.event_type == EV_KEY
    }

    pub fn key_state(&self) -> KeyState {
        KeyState::from(self.value)
    }
}

/// The (type, code, value) triple an event must carry to fire the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl Trigger {
    /// Power button pressed down. Release and auto-repeat do not match.
    pub const POWER_PRESS: Trigger = Trigger {
        event_type: EV_KEY,
        code: KEY_POWER,
        value: 1,
    };

    pub fn matches(&self, event: &InputEvent) -> bool {
        event.event_type == self.event_type && event.code == self.code && event.value == self.value
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::POWER_PRESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_constants() {
        assert_eq!(EV_KEY, 0x01);
        assert_eq!(KEY_POWER, 116);
        assert_eq!(RECORD_SIZE, size_of::<libc::timeval>() + 8);
    }

    #[test]
    fn test_decode_reads_payload_after_timestamp() {
        let mut record = [0xAAu8; RECORD_SIZE];
        record[PAYLOAD_OFFSET..PAYLOAD_OFFSET + 2].copy_from_slice(&EV_KEY.to_ne_bytes());
        record[PAYLOAD_OFFSET + 2..PAYLOAD_OFFSET + 4].copy_from_slice(&KEY_POWER.to_ne_bytes());
        record[PAYLOAD_OFFSET + 4..].copy_from_slice(&1i32.to_ne_bytes());

        let event = InputEvent::from_record(&record);
        assert_eq!(event, InputEvent::key(KEY_POWER, 1));
    }

    #[test]
    fn test_encoded_record_has_zero_timestamp() {
        let record = InputEvent::key(KEY_POWER, 2).to_record();
        assert!(record[..PAYLOAD_OFFSET].iter().all(|b| *b == 0));
        assert_eq!(InputEvent::from_record(&record).value, 2);
    }

    #[test]
    fn test_key_state_from_value() {
        assert_eq!(KeyState::from(0), KeyState::Release);
        assert_eq!(KeyState::from(1), KeyState::Press);
        assert_eq!(KeyState::from(2), KeyState::Repeat);
        assert_eq!(KeyState::from(7), KeyState::Other(7));
    }

    #[test]
    fn test_power_press_matches_only_key_down() {
        let trigger = Trigger::POWER_PRESS;
        assert!(trigger.matches(&InputEvent::key(KEY_POWER, 1)));
        assert!(!trigger.matches(&InputEvent::key(KEY_POWER, 0)));
        assert!(!trigger.matches(&InputEvent::key(KEY_POWER, 2)));
    }

    #[test]
    fn test_power_press_ignores_other_codes_and_types() {
        let trigger = Trigger::default();
        let volume_up = evdev::Key::KEY_VOLUMEUP.code();
        assert!(!trigger.matches(&InputEvent::key(volume_up, 1)));
        // EV_SYN and EV_MSC carrying the power code must not fire
        assert!(!trigger.matches(&InputEvent::new(0x00, KEY_POWER, 1)));
        assert!(!trigger.matches(&InputEvent::new(0x04, KEY_POWER, 1)));
    }

    #[test]
    fn test_is_key_event() {
        assert!(InputEvent::key(30, 1).is_key_event());
        assert!(!InputEvent::new(0x02, 0, 1).is_key_event()); // EV_REL
    }
}
