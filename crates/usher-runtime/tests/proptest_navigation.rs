//! Property tests: arbitrary intent sequences never drive the tour out of
//! bounds or into an inconsistent phase.

use proptest::prelude::*;
use usher_runtime::testing::{ManualClock, MockElement, MockViewport};
use usher_runtime::{Phase, Step, Tour, TourConfig};
use web_time::Duration;

#[derive(Debug, Clone)]
enum Intent {
    Start,
    Stop,
    Next,
    Prev,
    Move(usize),
    Pause,
    Resume,
    TickMs(u64),
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::Start),
        Just(Intent::Stop),
        Just(Intent::Next),
        Just(Intent::Prev),
        (0usize..10).prop_map(Intent::Move),
        Just(Intent::Pause),
        Just(Intent::Resume),
        (0u64..1500).prop_map(Intent::TickMs),
    ]
}

fn steps(len: usize) -> Vec<Step<MockElement>> {
    (0..len)
        .map(|i| {
            let step = Step::new().content(format!("step {i}"));
            // Give some steps a countdown so ticks exercise auto-advance.
            if i % 3 == 1 { step.duration_ms(400) } else { step }
        })
        .collect()
}

proptest! {
    #[test]
    fn index_stays_in_bounds(
        len in 1usize..6,
        intents in proptest::collection::vec(intent(), 1..80),
    ) {
        let mut clock = ManualClock::new();
        let mut tour =
            Tour::new(MockViewport::new(), steps(len), TourConfig::default()).unwrap();

        for action in intents {
            let now = clock.now();
            match action {
                Intent::Start => tour.start(now),
                Intent::Stop => tour.stop(now),
                Intent::Next => tour.next(false, now),
                Intent::Prev => tour.prev(false, now),
                Intent::Move(index) => tour.move_to(index, now),
                Intent::Pause => tour.pause(now),
                Intent::Resume => tour.resume(now),
                Intent::TickMs(ms) => {
                    let later = clock.advance(Duration::from_millis(ms));
                    tour.tick(later);
                }
            }

            prop_assert!(tour.current_index() < len);
            if tour.phase() == Phase::Idle {
                // Idle always rests at the start index.
                prop_assert_eq!(tour.current_index(), 0);
            }
        }
    }
}
