// Level progression: stage ordering, thresholds and per-stage assets.
use crate::tuning::{FINAL_IMAGE, SCORE_THRESHOLDS};

/// Highest playable level; upgrading past it wins the game.
pub const MAX_LEVEL: u8 = SCORE_THRESHOLDS.len() as u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Playable level, 1..=MAX_LEVEL.
    Level(u8),
    /// Terminal state after upgrading past the last level.
    Won,
}

impl Stage {
    pub const FIRST: Stage = Stage::Level(1);

    /// Score needed to upgrade out of this stage. `None` once won.
    pub fn threshold(self) -> Option<f64> {
        match self {
            Stage::Level(n) => SCORE_THRESHOLDS.get(usize::from(n).checked_sub(1)?).copied(),
            Stage::Won => None,
        }
    }

    pub fn next(self) -> Stage {
        match self {
            Stage::Level(n) if n < MAX_LEVEL => Stage::Level(n + 1),
            _ => Stage::Won,
        }
    }

    pub fn image_src(self) -> String {
        match self {
            Stage::Level(n) => format!("images/level{n}.png"),
            Stage::Won => FINAL_IMAGE.to_string(),
        }
    }

    pub fn level_label(self) -> String {
        match self {
            Stage::Level(n) => format!("Level {n}"),
            Stage::Won => "Game Over".to_string(),
        }
    }

    pub fn score_needed_label(self) -> String {
        match self.threshold() {
            Some(t) => format!("Score needed: {t}"),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_follow_levels() {
        assert_eq!(Stage::FIRST.threshold(), Some(2000.0));
        assert_eq!(Stage::Level(5).threshold(), Some(50000.0));
        assert_eq!(Stage::Level(6).threshold(), Some(10000.0));
        assert_eq!(Stage::Level(7).threshold(), Some(200000.0));
        assert_eq!(Stage::Won.threshold(), None);
        assert_eq!(Stage::Level(0).threshold(), None);
    }

    #[test]
    fn next_walks_to_won() {
        let mut s = Stage::FIRST;
        for n in 2..=MAX_LEVEL {
            s = s.next();
            assert_eq!(s, Stage::Level(n));
        }
        assert_eq!(s.next(), Stage::Won);
        assert_eq!(Stage::Won.next(), Stage::Won);
    }

    #[test]
    fn labels() {
        assert_eq!(Stage::Level(3).level_label(), "Level 3");
        assert_eq!(Stage::Level(3).score_needed_label(), "Score needed: 12000");
        assert_eq!(Stage::Level(3).image_src(), "images/level3.png");
        assert_eq!(Stage::Won.level_label(), "Game Over");
        assert_eq!(Stage::Won.score_needed_label(), "");
        assert_eq!(Stage::Won.image_src(), "images/final.png");
    }
}
