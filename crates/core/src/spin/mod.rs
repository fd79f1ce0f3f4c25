//! Spin state machine. Owns the draw configuration, the history ledger and
//! the displayed number; every mutation goes through [`DrawSession`].
//!
//! The session is synchronous and timer-free. [`crate::DrawEngine`] wraps it
//! with the animation timer and the feedback port.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::selector::{has_selectable, select_winner};
use crate::{DrawConfig, DrawHistoryItem, DrawRange, HistoryLedger, Result, WheelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinState {
    Idle,
    Spinning,
    /// Idle again, holding the number committed by the last stop.
    Resolved(i64),
}

impl SpinState {
    pub fn is_spinning(&self) -> bool {
        matches!(self, Self::Spinning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new spin began. Ticks must present this epoch to animate.
    Started { epoch: u64 },
    AlreadySpinning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Won(DrawHistoryItem),
    NotSpinning,
}

/// Read-only view handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub current_number: Option<i64>,
    pub is_spinning: bool,
    pub celebrating: bool,
    /// Newest first.
    pub history: Vec<DrawHistoryItem>,
    pub range: DrawRange,
}

impl DisplaySnapshot {
    pub fn drawn_count(&self) -> usize {
        self.history.len()
    }

    /// History paired with its 1-based draw ordinal, newest first.
    pub fn numbered_history(&self) -> impl Iterator<Item = (usize, &DrawHistoryItem)> {
        let total = self.history.len();
        self.history
            .iter()
            .enumerate()
            .map(move |(idx, item)| (total - idx, item))
    }
}

#[derive(Debug)]
pub struct DrawSession {
    config: DrawConfig,
    range: DrawRange,
    history: HistoryLedger,
    state: SpinState,
    current_number: Option<i64>,
    celebrating: bool,
    epoch: u64,
    rng: StdRng,
}

impl DrawSession {
    pub fn new(config: DrawConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: DrawConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: DrawConfig, rng: StdRng) -> Result<Self> {
        let range = validate(&config)?;
        Ok(Self {
            config,
            range,
            history: HistoryLedger::new(),
            state: SpinState::Idle,
            current_number: None,
            celebrating: false,
            epoch: 0,
            rng,
        })
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn range(&self) -> DrawRange {
        self.range
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    pub fn current_number(&self) -> Option<i64> {
        self.current_number
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Replaces the configuration. Invalid ranges are rejected and the old
    /// configuration is kept.
    pub fn set_config(&mut self, config: DrawConfig) -> Result<()> {
        self.range = validate(&config)?;
        tracing::info!(
            min = config.min,
            max = config.max,
            priority = config.priority_list.len(),
            "draw configuration updated"
        );
        self.config = config;
        Ok(())
    }

    /// Whether the next stop could commit a winner.
    pub fn can_draw(&self) -> bool {
        has_selectable(
            self.range,
            self.history.list_drawn_numbers(),
            &self.config.priority_list,
        )
    }

    pub fn start(&mut self) -> Result<StartOutcome> {
        if self.is_spinning() {
            tracing::debug!("start ignored: already spinning");
            return Ok(StartOutcome::AlreadySpinning);
        }

        if !self.can_draw() {
            tracing::info!(range = %self.range, "start rejected: range exhausted");
            return Err(WheelError::Exhausted);
        }

        self.epoch += 1;
        self.state = SpinState::Spinning;
        self.celebrating = false;
        tracing::info!(epoch = self.epoch, range = %self.range, "spin started");
        Ok(StartOutcome::Started { epoch: self.epoch })
    }

    /// One animation frame: shows a decorative number drawn from the whole
    /// range, ignoring history. Returns `None` when `epoch` no longer
    /// belongs to an active spin.
    pub fn animate(&mut self, epoch: u64) -> Option<i64> {
        if !self.is_spinning() || epoch != self.epoch {
            return None;
        }

        let number = self.rng.gen_range(self.range.min()..=self.range.max());
        self.current_number = Some(number);
        tracing::trace!(number, "spin frame");
        Some(number)
    }

    /// Leaves the spin and commits a winner.
    pub fn stop(&mut self) -> Result<StopOutcome> {
        if !self.is_spinning() {
            tracing::debug!("stop ignored: not spinning");
            return Ok(StopOutcome::NotSpinning);
        }

        // Leaving `Spinning` first turns any in-flight frame into a no-op.
        self.state = SpinState::Idle;

        let winner = select_winner(
            self.range,
            self.history.list_drawn_numbers(),
            &self.config.priority_list,
            &mut self.rng,
        );

        let Some(number) = winner else {
            self.current_number = self.history.latest().map(|item| item.number);
            tracing::warn!(range = %self.range, "stop found no number left to draw");
            return Err(WheelError::Exhausted);
        };

        let item = DrawHistoryItem::now(number);
        let recorded = self.history.append(item.clone());
        if !recorded {
            tracing::error!(number, "selected number was already in the history");
        }
        debug_assert!(recorded, "number {number} drawn twice");
        self.current_number = Some(number);
        self.state = SpinState::Resolved(number);
        self.celebrating = true;
        tracing::info!(number, drawn = self.history.len(), "winner drawn");
        Ok(StopOutcome::Won(item))
    }

    /// Empties the history, forgets the displayed number and abandons any
    /// running spin.
    pub fn clear(&mut self) {
        self.history.clear();
        self.current_number = None;
        self.state = SpinState::Idle;
        self.celebrating = false;
        self.epoch += 1;
        tracing::info!("history cleared");
    }

    /// Ends the celebration started by the spin with `epoch`. Stale epochs
    /// are ignored.
    pub fn end_celebration(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch || !self.celebrating {
            return false;
        }
        self.celebrating = false;
        true
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            current_number: self.current_number,
            is_spinning: self.is_spinning(),
            celebrating: self.celebrating,
            history: self.history.all(),
            range: self.range,
        }
    }
}

fn validate(config: &DrawConfig) -> Result<DrawRange> {
    let range = config.range()?;
    let inert = config.inert_priorities();
    if !inert.is_empty() {
        tracing::warn!(?inert, range = %range, "priority numbers outside the range will never be drawn");
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn session(min: i64, max: i64, priority: Vec<i64>) -> DrawSession {
        DrawSession::with_seed(DrawConfig::new(min, max).with_priority(priority), 11).unwrap()
    }

    fn spin_once(session: &mut DrawSession) -> Result<i64> {
        let StartOutcome::Started { epoch } = session.start()? else {
            panic!("session was already spinning");
        };
        session.animate(epoch);
        match session.stop()? {
            StopOutcome::Won(item) => Ok(item.number),
            StopOutcome::NotSpinning => panic!("stop after start must resolve"),
        }
    }

    #[test]
    fn small_range_draws_each_number_once_then_exhausts() {
        let mut session = session(1, 3, vec![]);

        let drawn: BTreeSet<i64> = (0..3).map(|_| spin_once(&mut session).unwrap()).collect();
        assert_eq!(drawn, BTreeSet::from([1, 2, 3]));

        let err = session.start().unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(session.state(), SpinState::Resolved(session.current_number().unwrap()));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn drawn_priority_list_does_not_keep_start_alive() {
        let mut session = session(1, 2, vec![2, 1, 2]);
        assert_eq!(spin_once(&mut session).unwrap(), 2);
        assert_eq!(spin_once(&mut session).unwrap(), 1);
        let before = session.snapshot();
        let epoch = session.epoch();

        assert!(session.start().unwrap_err().is_exhausted());

        assert_eq!(session.snapshot(), before);
        assert_eq!(session.epoch(), epoch);
        assert!(!session.is_spinning());
    }

    #[test]
    fn snapshot_with_inverted_range_does_not_deserialize() {
        let json = r#"{"current_number":null,"is_spinning":false,"celebrating":false,
            "history":[],"range":{"min":9,"max":2}}"#;
        assert!(serde_json::from_str::<DisplaySnapshot>(json).is_err());
    }

    #[test]
    fn priority_number_wins_first() {
        for seed in 0..10 {
            let config = DrawConfig::new(1, 100).with_priority(vec![42]);
            let mut session = DrawSession::with_seed(config, seed).unwrap();
            assert_eq!(spin_once(&mut session).unwrap(), 42);
        }
    }

    #[test]
    fn priority_numbers_are_consumed_in_order() {
        let mut session = session(1, 50, vec![30, 10, 30, 20]);
        let winners: Vec<i64> = (0..3).map(|_| spin_once(&mut session).unwrap()).collect();
        assert_eq!(winners, vec![30, 10, 20]);
    }

    #[test]
    fn stop_while_idle_changes_nothing() {
        let mut session = session(1, 10, vec![]);
        spin_once(&mut session).unwrap();
        let before = session.snapshot();

        assert_eq!(session.stop().unwrap(), StopOutcome::NotSpinning);
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn start_while_spinning_is_a_no_op() {
        let mut session = session(1, 10, vec![]);
        let first = session.start().unwrap();
        let epoch = session.epoch();

        assert_eq!(session.start().unwrap(), StartOutcome::AlreadySpinning);
        assert_eq!(first, StartOutcome::Started { epoch });
        assert_eq!(session.epoch(), epoch);
        assert!(session.is_spinning());
    }

    #[test]
    fn frames_only_animate_the_active_spin() {
        let mut session = session(5, 9, vec![]);
        let StartOutcome::Started { epoch } = session.start().unwrap() else {
            unreachable!()
        };

        for _ in 0..50 {
            let number = session.animate(epoch).unwrap();
            assert!((5..=9).contains(&number));
        }
        assert_eq!(session.animate(epoch + 1), None);

        session.stop().unwrap();
        let resolved = session.current_number();
        assert_eq!(session.animate(epoch), None);
        assert_eq!(session.current_number(), resolved);
    }

    #[test]
    fn clear_makes_the_range_available_again() {
        let mut session = session(1, 2, vec![]);
        spin_once(&mut session).unwrap();
        spin_once(&mut session).unwrap();
        assert!(!session.can_draw());

        session.clear();

        assert!(session.history().is_empty());
        assert_eq!(session.current_number(), None);
        assert_eq!(session.state(), SpinState::Idle);
        assert!(session.can_draw());
        spin_once(&mut session).unwrap();
    }

    #[test]
    fn clear_abandons_a_running_spin() {
        let mut session = session(1, 10, vec![]);
        let StartOutcome::Started { epoch } = session.start().unwrap() else {
            unreachable!()
        };

        session.clear();

        assert!(!session.is_spinning());
        assert_eq!(session.animate(epoch), None);
        assert_eq!(session.stop().unwrap(), StopOutcome::NotSpinning);
    }

    #[test]
    fn exhaustion_at_stop_keeps_history_and_restores_display() {
        let mut session = session(1, 2, vec![]);
        let first = spin_once(&mut session).unwrap();

        let StartOutcome::Started { epoch } = session.start().unwrap() else {
            unreachable!()
        };
        session.animate(epoch);
        // Narrowing the range mid-spin leaves nothing to draw.
        session.set_config(DrawConfig::new(first, first)).unwrap();

        assert!(session.stop().unwrap_err().is_exhausted());
        assert_eq!(session.state(), SpinState::Idle);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.current_number(), Some(first));
    }

    #[test]
    fn invalid_config_is_rejected_and_previous_kept() {
        let mut session = session(1, 10, vec![]);
        let err = session.set_config(DrawConfig::new(9, 2)).unwrap_err();

        assert!(matches!(err, WheelError::InvalidRange { .. }));
        assert_eq!(session.range(), DrawRange::new(1, 10).unwrap());
        assert!(DrawSession::new(DrawConfig::new(3, 1)).is_err());
    }

    #[test]
    fn celebration_ends_only_for_its_own_spin() {
        let mut session = session(1, 10, vec![]);
        spin_once(&mut session).unwrap();
        let epoch = session.epoch();
        assert!(session.is_celebrating());

        assert!(!session.end_celebration(epoch - 1));
        assert!(session.end_celebration(epoch));
        assert!(!session.is_celebrating());

        spin_once(&mut session).unwrap();
        session.start().unwrap();
        assert!(!session.is_celebrating());
    }

    #[test]
    fn snapshot_numbers_history_from_oldest() {
        let mut session = session(1, 10, vec![3, 7]);
        spin_once(&mut session).unwrap();
        spin_once(&mut session).unwrap();

        let snapshot = session.snapshot();
        let numbered: Vec<(usize, i64)> = snapshot
            .numbered_history()
            .map(|(ordinal, item)| (ordinal, item.number))
            .collect();

        assert_eq!(numbered, vec![(2, 7), (1, 3)]);
        assert_eq!(snapshot.drawn_count(), 2);
        assert!(!snapshot.is_spinning);
    }
}
