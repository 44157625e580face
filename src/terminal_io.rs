use std::collections::HashMap;

use crossterm::event::{Event, KeyCode};

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events }
    }

    /// A short scripted run: start, strafe, fire a volley, quit back to the title.
    pub fn demo(max_frames: u64) -> Self {
        let mut script = SimulatedInput::new(HashMap::new());
        script.push(1, KeyCode::Enter);
        for frame in (3..12).step_by(2) {
            script.push(frame, KeyCode::Left);
        }
        for frame in (12..60).step_by(3) {
            script.push(frame, KeyCode::Char(' '));
            script.push(frame + 1, KeyCode::Right);
        }
        script.push(max_frames.saturating_sub(2).max(61), KeyCode::Char('q'));
        script
    }

    pub fn push(&mut self, frame: u64, code: KeyCode) {
        self.events.entry(frame).or_default().push(Event::Key(code.into()));
    }

    /// All events scheduled for `frame`, in insertion order.
    pub fn take(&mut self, frame: u64) -> Vec<Event> {
        self.events.remove(&frame).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_delivered_once_on_their_frame() {
        let mut input = SimulatedInput::new(HashMap::new());
        input.push(2, KeyCode::Left);
        input.push(2, KeyCode::Char(' '));
        assert!(input.take(1).is_empty());
        let frame_two = input.take(2);
        assert_eq!(
            frame_two,
            vec![Event::Key(KeyCode::Left.into()), Event::Key(KeyCode::Char(' ').into())]
        );
        assert!(input.take(2).is_empty());
    }

    #[test]
    fn demo_starts_then_quits() {
        let mut input = SimulatedInput::demo(120);
        assert_eq!(input.take(1), vec![Event::Key(KeyCode::Enter.into())]);
        assert_eq!(input.take(118), vec![Event::Key(KeyCode::Char('q').into())]);
    }
}
