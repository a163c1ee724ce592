// Integration tests (native) for the `spin-stress` crate.
// These drive the public state machine through the virtual clock so timer
// interplay (sampler, decay, countdown) runs deterministically on the host.

use std::time::Duration;

use spin_stress::{Decay, Effect, Game, Notice, Stage, Task, VirtualClock};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn started() -> (Game, VirtualClock) {
    let mut game = Game::new();
    let mut clock = VirtualClock::new();
    clock.settle(&mut game);
    (game, clock)
}

// Three long strokes, one per sampler tick, each worth 1000 points:
// 2.5 stress per tick, 7.5 after the third tick at t=600ms.
fn stress_out(game: &mut Game, clock: &mut VirtualClock) -> Vec<Effect> {
    let mut out = Vec::new();
    game.pointer_down(0.0);
    for _ in 0..3 {
        game.pointer_move(100_000.0);
        out.extend(clock.advance(game, ms(200)));
    }
    out
}

#[test]
fn idle_page_stays_calm() {
    let (mut game, mut clock) = started();
    clock.advance(&mut game, ms(600));
    assert_eq!(game.stress(), 0.0);
    assert_eq!(clock.decay_timers(), 0);
    assert!(clock.is_running(Task::Sampler));
}

#[test]
fn countdown_runs_to_self_destruct() {
    let (mut game, mut clock) = started();
    let effects = stress_out(&mut game, &mut clock);
    assert_eq!(effects, vec![Effect::PlaySpin]);
    assert!(game.stress() >= 7.0);
    assert!(clock.is_running(Task::Countdown));
    assert!(game.view().warning_text.contains("5 seconds"));

    let effects = clock.advance(&mut game, ms(5000));
    assert!(effects.is_empty());
    assert_eq!(game.countdown_remaining(), Some(0));
    assert!(game.view().warning_text.contains("0 seconds"));

    let effects = clock.advance(&mut game, ms(1000));
    assert_eq!(effects, vec![Effect::PlayExplosion, Effect::Notify(Notice::Mess)]);
    assert!(!clock.is_running(Task::Countdown));
    assert_eq!(game.score(), 0.0);
    assert_eq!(game.stress(), 0.0);
    assert_eq!(game.stage(), Stage::Level(1));
    assert!(!game.view().warning_visible);
    assert_eq!(game.view().score_text, "Score: 0");
}

#[test]
fn calming_down_cancels_countdown() {
    let (mut game, mut clock) = started();
    stress_out(&mut game, &mut clock);

    clock.advance(&mut game, ms(2400));
    assert_eq!(game.countdown_remaining(), Some(3));

    game.pointer_up();
    let effects = clock.advance(&mut game, ms(200));
    assert_eq!(effects, vec![Effect::StopSpin]);
    assert_eq!(game.countdown_remaining(), None);
    assert!(!clock.is_running(Task::Countdown));
    assert!(!game.view().warning_visible);
    assert_eq!(game.score(), 3000.0);

    // still red until the fast decay reaches zero
    assert!(game.view().high_stress);
    let effects = clock.advance(&mut game, ms(1000));
    assert!(effects.is_empty());
    assert_eq!(game.stress(), 0.0);
    assert_eq!(clock.decay_timers(), 0);
    assert!(!game.view().high_stress);
    assert_eq!(game.score(), 3000.0);
}

#[test]
fn release_starts_fast_decay() {
    let (mut game, mut clock) = started();
    game.pointer_down(0.0);
    game.pointer_move(20_000.0);
    clock.advance(&mut game, ms(200));
    let stress = game.stress();
    assert!(stress > 0.0 && stress < 3.0, "stress {stress}");
    assert_eq!(clock.decay_timers(), 0, "no decay while spinning");

    game.pointer_up();
    clock.settle(&mut game);
    assert!(clock.is_running(Task::Decay(Decay::Fast)));

    clock.advance(&mut game, ms(100));
    assert_eq!(game.stress(), 0.0);
    assert_eq!(clock.decay_timers(), 0);
}

#[test]
fn tap_without_drag_is_silent() {
    let (mut game, mut clock) = started();
    game.pointer_down(10.0);
    game.pointer_up();
    let effects = clock.advance(&mut game, ms(1000));
    assert!(effects.is_empty());
    assert_eq!(game.score(), 0.0);
    assert_eq!(game.stress(), 0.0);
    assert_eq!(clock.decay_timers(), 0);
}

#[test]
fn score_is_sum_of_cumulative_offsets() {
    let (mut game, mut clock) = started();
    let xs = [130.0, 260.0, 170.0, 40.0, 300.0];
    let origin = 100.0;
    game.pointer_down(origin);
    let mut expected = 0.0;
    let mut last = game.score();
    for (i, x) in xs.iter().enumerate() {
        game.pointer_move(*x);
        expected += ((x - origin) * 0.01_f64).abs();
        assert!(game.score() >= last);
        last = game.score();
        if i % 2 == 0 {
            clock.advance(&mut game, ms(200));
        }
    }
    game.pointer_up();
    assert!((game.score() - expected).abs() < 1e-9);
}

#[test]
fn level_ups_follow_thresholds() {
    let (mut game, mut clock) = started();
    assert!(!game.upgrade());

    game.pointer_down(0.0);
    game.pointer_move(100_000.0);
    game.pointer_move(100_000.0);
    game.pointer_up();
    clock.settle(&mut game);
    assert!(game.upgrade_enabled());
    assert!(game.upgrade());
    assert_eq!(game.stage(), Stage::Level(2));
    assert_eq!(game.view().level_text, "Level 2");
    assert!(!game.upgrade(), "level 2 needs 6000");
}

// Deterministic mixed input: decay timers never overlap and stress stays in range.
#[test]
fn timers_and_stress_stay_within_invariants() {
    let (mut game, mut clock) = started();
    let mut seed: u64 = 0x5eed;
    let mut next = || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as u32
    };

    let mut pressed = false;
    for _ in 0..2000 {
        match next() % 6 {
            0 if !pressed => {
                game.pointer_down(f64::from(next() % 800));
                pressed = true;
            }
            1 | 2 if pressed => game.pointer_move(f64::from(next() % 4000)),
            3 if pressed => {
                game.pointer_up();
                pressed = false;
            }
            4 => {
                game.upgrade();
            }
            _ => {
                clock.advance(&mut game, ms(u64::from(next() % 700)));
            }
        }
        clock.settle(&mut game);
        assert!(clock.decay_timers() <= 1);
        assert_eq!(
            game.active_decay().map(Task::Decay).is_some_and(|t| clock.is_running(t)),
            game.active_decay().is_some()
        );
        assert_eq!(game.countdown_remaining().is_some(), clock.is_running(Task::Countdown));
        assert!((0.0..=10.0).contains(&game.stress()));
        assert!(game.velocity().is_finite());
    }
}
