//! Core game logic and state management
//!
//! This module contains [`QuizState`], the single record a presentation layer
//! drives: it renders the prompt and three flags, forwards taps and notice
//! dismissals, and re-renders from [`QuizState::sync_message`] whenever an
//! operation reports a change.
//!
//! A game alternates between two phases. [`Phase::AwaitingTap`] accepts
//! exactly one tap; [`Phase::ShowingResult`] accepts no taps and ends when the
//! notice is dismissed or, under rules with auto-advance, when the scheduled
//! [`AlarmMessage`] is delivered back.

use std::time::Duration;

use enum_map::{Enum, EnumMap};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;
use web_time::SystemTime;

use crate::{
    AlarmMessage,
    config::{NoticePolicy, Options, Rules},
    constants::round::ROUND_SIZE,
    notice::ResultNotice,
    pool::CountryPool,
    round::Round,
};

/// Whether the game is waiting for a tap or showing the outcome of one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// A round is on screen and the flags accept a tap
    #[default]
    AwaitingTap,
    /// A flag was tapped; input stays disabled until the round moves on
    ShowingResult,
}

/// Correctness of a tap, without its details
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Enum, Serialize, Deserialize, derive_more::Display,
)]
pub enum Verdict {
    /// The tapped flag was the one asked for
    Correct,
    /// The tapped flag belonged to another country
    Wrong,
}

/// Outcome of the last tap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapResult {
    /// The tapped flag was the one asked for
    Correct,
    /// The tapped flag belonged to another country
    Wrong {
        /// The country whose flag was tapped
        missed_country: String,
    },
}

impl TapResult {
    /// Returns the verdict of this result
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Correct => Verdict::Correct,
            Self::Wrong { .. } => Verdict::Wrong,
        }
    }
}

/// Events the presentation layer forwards to the game
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum IncomingMessage {
    /// The flag at this index was tapped
    Tap(usize),
    /// The result notice was dismissed
    Dismiss,
}

/// Errors for events the game refuses in its current phase
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A tap arrived while the result of the previous one is on screen
    #[error("input is disabled until the round moves on")]
    InputDisabled,
    /// A tap named a flag that is not displayed
    #[error("flag {index} does not exist, the round shows {len} flags")]
    IndexOutOfRange {
        /// The requested flag index
        index: usize,
        /// Number of flags on screen
        len: usize,
    },
    /// A dismissal arrived while no notice is on screen
    #[error("there is no notice to dismiss")]
    NothingToDismiss,
}

/// Snapshot of everything the presentation layer renders
///
/// The index of the correct flag is not included; only the prompt names
/// the country asked for.
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// A round is on screen and waiting for a tap
    AwaitingTap {
        /// Country the player is asked to find
        prompt: String,
        /// Countries of the displayed flags, in flag order
        flags: Vec<String>,
        /// Current score
        score: u64,
    },
    /// A tap was made and its result is on screen
    ShowingResult {
        /// Country the player was asked to find
        prompt: String,
        /// Countries of the displayed flags, in flag order
        flags: Vec<String>,
        /// Score after the tap
        score: u64,
        /// Outcome of the tap
        result: TapResult,
        /// The notice to raise, if the rules raise one for this result
        notice: Option<ResultNotice>,
    },
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Alarms scheduled while reducing, with the delay after which each is due
pub type ScheduledAlarms = Vec<(AlarmMessage, Duration)>;

/// The mutable game record
///
/// Created once per session, mutated only through its operations, never
/// persisted.
#[derive(Debug, Clone)]
pub struct QuizState {
    /// Scoring and flow rules in force
    rules: Rules,
    /// Countries rounds are drawn from
    pool: CountryPool,
    /// The round on screen
    round: Round,
    /// Number of rounds started so far, the current one included
    round_number: u64,
    /// Current score
    score: u64,
    /// Highest score reached this session
    best_score: u64,
    /// Result of the tap made this round, if any
    last_result: Option<TapResult>,
    /// Current phase
    phase: Phase,
    /// When the tap of this round was accepted
    tapped_at: Option<SystemTime>,
    /// Taps accepted this session, per verdict
    tally: EnumMap<Verdict, u64>,
    /// Source of randomness for rounds
    rng: fastrand::Rng,
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl QuizState {
    /// Starts a game with the given options
    ///
    /// The first round is drawn immediately and the score starts at zero.
    pub fn new(options: Options) -> Self {
        let rng = options
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

        Self::with_rng(options.rules.rules(), options.pool, rng)
    }

    /// Starts a game drawing rounds from an existing random number generator
    pub fn with_rng(rules: Rules, pool: CountryPool, mut rng: fastrand::Rng) -> Self {
        let round = Round::draw(&pool, &mut rng);
        debug!("round 1 asks for {} among {}", round.prompt(), round.describe());

        Self {
            rules,
            pool,
            round,
            round_number: 1,
            score: 0,
            best_score: 0,
            last_result: None,
            phase: Phase::AwaitingTap,
            tapped_at: None,
            tally: EnumMap::default(),
            rng,
        }
    }

    /// Replaces the round on screen with a freshly drawn one
    ///
    /// Leaves the game awaiting a tap. The score is not touched.
    pub fn new_round(&mut self) {
        self.round = Round::draw(&self.pool, &mut self.rng);
        self.round_number += 1;
        self.phase = Phase::AwaitingTap;
        self.last_result = None;
        self.tapped_at = None;

        debug!(
            "round {} asks for {} among {}",
            self.round_number,
            self.round.prompt(),
            self.round.describe()
        );
    }

    /// Handles a tap on the flag at `index`
    ///
    /// A correct tap adds one point. A wrong tap records the country that
    /// was tapped and, if the rules say so, resets the score. Either way the
    /// game moves to [`Phase::ShowingResult`]. When a correct tap happens
    /// under rules with auto-advance, an [`AlarmMessage::AdvanceRound`] is
    /// handed to `schedule_message` along with its delay.
    ///
    /// # Errors
    ///
    /// * `Error::InputDisabled` - The round already has a tap
    /// * `Error::IndexOutOfRange` - No flag is displayed at `index`
    ///
    /// The state is unchanged when an error is returned.
    pub fn flag_tapped<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        index: usize,
        mut schedule_message: S,
    ) -> Result<&TapResult, Error> {
        if self.phase != Phase::AwaitingTap {
            return Err(Error::InputDisabled);
        }
        let Some(country) = self.round.country(index) else {
            return Err(Error::IndexOutOfRange {
                index,
                len: ROUND_SIZE,
            });
        };

        let result = if self.round.is_correct(index) {
            self.score += 1;
            TapResult::Correct
        } else {
            let missed_country = country.to_owned();
            if self.rules.wrong_resets_score {
                self.score = 0;
            }
            TapResult::Wrong { missed_country }
        };

        info!(
            "round {}: tapped {index} ({}) looking for {}, score is now {}",
            self.round_number,
            result.verdict(),
            self.round.prompt(),
            self.score
        );

        self.tally[result.verdict()] += 1;
        self.best_score = self.best_score.max(self.score);
        self.tapped_at = Some(SystemTime::now());
        self.phase = Phase::ShowingResult;

        if let (TapResult::Correct, Some(delay)) = (&result, self.rules.auto_advance) {
            schedule_message(
                AlarmMessage::AdvanceRound {
                    round: self.round_number,
                },
                delay,
            );
        }

        let result: &TapResult = self.last_result.insert(result);
        Ok(result)
    }

    /// Handles the player dismissing the result notice
    ///
    /// Resets the score if the rules say so, then starts a new round.
    ///
    /// # Errors
    ///
    /// * `Error::NothingToDismiss` - No notice is on screen, either because
    ///   the game is awaiting a tap or because the rules raise none for this
    ///   result (the round then moves on through its alarm)
    pub fn dismiss_result_and_continue(&mut self) -> Result<(), Error> {
        if self.notice().is_none() {
            return Err(Error::NothingToDismiss);
        }

        if self.rules.dismiss_resets_score {
            self.score = 0;
        }
        self.new_round();

        Ok(())
    }

    /// Applies an event from the presentation layer
    ///
    /// Events refused in the current phase are logged and dropped.
    ///
    /// # Returns
    ///
    /// `true` if the state changed and should be re-rendered
    pub fn receive_message<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        message: &IncomingMessage,
        schedule_message: S,
    ) -> bool {
        let outcome = match message {
            IncomingMessage::Tap(index) => self.flag_tapped(*index, schedule_message).map(|_| ()),
            IncomingMessage::Dismiss => self.dismiss_result_and_continue(),
        };

        match outcome {
            Ok(()) => true,
            Err(error) => {
                debug!("ignoring {message:?}: {error}");
                false
            }
        }
    }

    /// Handles an alarm previously handed to a scheduler
    ///
    /// Alarms for rounds that have already moved on are ignored.
    ///
    /// # Returns
    ///
    /// `true` if the state changed and should be re-rendered
    pub fn receive_alarm(&mut self, message: &AlarmMessage) -> bool {
        match message {
            AlarmMessage::AdvanceRound { round }
                if *round == self.round_number && self.phase == Phase::ShowingResult =>
            {
                self.new_round();
                true
            }
            AlarmMessage::AdvanceRound { round } => {
                debug!("ignoring stale alarm for round {round}");
                false
            }
        }
    }

    /// Applies an event to an owned state and returns the next state
    ///
    /// Alarms the event schedules are returned alongside the state so the
    /// caller can deliver them later through [`QuizState::receive_alarm`].
    #[must_use]
    pub fn reduce(mut self, message: &IncomingMessage) -> (Self, ScheduledAlarms) {
        let mut alarms = ScheduledAlarms::new();
        self.receive_message(message, |alarm, delay| alarms.push((alarm, delay)));
        (self, alarms)
    }

    /// Returns the result notice to raise, if any
    ///
    /// There is no notice while awaiting a tap, nor after a correct tap
    /// when the rules only raise it for wrong ones.
    pub fn notice(&self) -> Option<ResultNotice> {
        if self.phase != Phase::ShowingResult {
            return None;
        }
        let result = self.last_result.as_ref()?;

        match (self.rules.notice, result) {
            (NoticePolicy::WrongOnly, TapResult::Correct) => None,
            _ => Some(ResultNotice::new(result, self.score)),
        }
    }

    /// Builds a snapshot of the state for rendering
    pub fn sync_message(&self) -> SyncMessage {
        let prompt = self.round.prompt().to_owned();
        let flags = self.round.countries().to_vec();

        match (&self.phase, &self.last_result) {
            (Phase::ShowingResult, Some(result)) => SyncMessage::ShowingResult {
                prompt,
                flags,
                score: self.score,
                result: result.clone(),
                notice: self.notice(),
            },
            _ => SyncMessage::AwaitingTap {
                prompt,
                flags,
                score: self.score,
            },
        }
    }

    /// Returns the country the player is asked to find
    pub fn prompt(&self) -> &str {
        self.round.prompt()
    }

    /// Returns the countries of the displayed flags
    pub fn countries(&self) -> &[String] {
        self.round.countries()
    }

    /// Returns the round on screen
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Returns how many rounds have been started, the current one included
    pub fn round_number(&self) -> u64 {
        self.round_number
    }

    /// Returns the current score
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Returns the highest score reached this session
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Returns the result of this round's tap, if any
    pub fn last_result(&self) -> Option<&TapResult> {
        self.last_result.as_ref()
    }

    /// Returns the current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the flags currently accept a tap
    pub fn accepts_taps(&self) -> bool {
        self.phase == Phase::AwaitingTap
    }

    /// Returns the rules in force
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Returns the number of taps accepted this session, per verdict
    pub fn tally(&self) -> &EnumMap<Verdict, u64> {
        &self.tally
    }

    /// Returns the time elapsed since this round's tap
    ///
    /// Presentation layers derive tap animations from this.
    pub fn elapsed_since_tap(&self) -> Option<Duration> {
        self.tapped_at
            .map(|tapped_at| tapped_at.elapsed().unwrap_or_default())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::Variant;

    fn create_state(variant: Variant, seed: u64) -> QuizState {
        QuizState::new(Options {
            seed: Some(seed),
            ..Options::with_variant(variant)
        })
    }

    fn wrong_index(state: &QuizState) -> usize {
        (state.round().correct_answer() + 1) % ROUND_SIZE
    }

    fn tap(state: &mut QuizState, index: usize) -> Result<TapResult, Error> {
        state.flag_tapped(index, |_, _| ()).cloned()
    }

    fn tap_correct(state: &mut QuizState) {
        let index = state.round().correct_answer();
        tap(state, index).unwrap();
    }

    #[test]
    fn test_initial_state() {
        let state = create_state(Variant::Plain, 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.best_score(), 0);
        assert_eq!(state.phase(), Phase::AwaitingTap);
        assert_eq!(state.round_number(), 1);
        assert!(state.last_result().is_none());
        assert!(state.notice().is_none());
        assert!(state.accepts_taps());
        assert!(state.elapsed_since_tap().is_none());
    }

    #[test]
    fn test_round_invariants_hold_over_many_rounds() {
        let mut state = create_state(Variant::Plain, 2);
        for _ in 0..200 {
            assert_eq!(state.countries().len(), ROUND_SIZE);
            assert!(state.round().correct_answer() < ROUND_SIZE);
            assert_eq!(state.prompt(), state.countries()[state.round().correct_answer()]);
            state.new_round();
        }
    }

    #[test]
    fn test_new_round_eventually_uses_every_position() {
        let mut state = create_state(Variant::Plain, 3);
        let mut seen = [false; ROUND_SIZE];
        for _ in 0..300 {
            seen[state.round().correct_answer()] = true;
            state.new_round();
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_correct_tap_scores_one_point() {
        let mut state = create_state(Variant::Plain, 4);
        let index = state.round().correct_answer();

        assert_eq!(tap(&mut state, index), Ok(TapResult::Correct));
        assert_eq!(state.score(), 1);
        assert_eq!(state.last_result(), Some(&TapResult::Correct));
        assert_eq!(state.phase(), Phase::ShowingResult);
        assert!(state.elapsed_since_tap().is_some());
    }

    #[test]
    fn test_correct_tap_increments_in_both_variants() {
        for variant in [Variant::Plain, Variant::Animated] {
            let mut state = create_state(variant, 5);
            for expected in 1..=4 {
                tap_correct(&mut state);
                assert_eq!(state.score(), expected);
                match variant {
                    Variant::Plain => state.dismiss_result_and_continue().unwrap(),
                    Variant::Animated => {
                        let alarm = AlarmMessage::AdvanceRound {
                            round: state.round_number(),
                        };
                        assert!(state.receive_alarm(&alarm));
                    }
                }
            }
        }
    }

    #[test]
    fn test_wrong_tap_names_tapped_country() {
        for variant in [Variant::Plain, Variant::Animated] {
            let mut state = create_state(variant, 6);
            let index = wrong_index(&state);
            let tapped = state.countries()[index].clone();

            assert_eq!(
                tap(&mut state, index),
                Ok(TapResult::Wrong {
                    missed_country: tapped
                })
            );
            assert_eq!(state.phase(), Phase::ShowingResult);
        }
    }

    #[test]
    fn test_plain_wrong_tap_resets_score() {
        let mut state = create_state(Variant::Plain, 7);
        for _ in 0..3 {
            tap_correct(&mut state);
            state.dismiss_result_and_continue().unwrap();
        }
        assert_eq!(state.score(), 3);

        let index = wrong_index(&state);
        tap(&mut state, index).unwrap();
        assert_eq!(state.score(), 0);
        assert_eq!(state.best_score(), 3);
    }

    #[test]
    fn test_animated_wrong_tap_keeps_score_until_dismissed() {
        let mut state = create_state(Variant::Animated, 8);
        tap_correct(&mut state);
        assert!(state.receive_alarm(&AlarmMessage::AdvanceRound { round: 1 }));
        tap_correct(&mut state);
        assert!(state.receive_alarm(&AlarmMessage::AdvanceRound { round: 2 }));
        assert_eq!(state.score(), 2);

        let index = wrong_index(&state);
        tap(&mut state, index).unwrap();
        assert_eq!(state.score(), 2);
        assert_eq!(
            state.notice().map(|n| n.message),
            Some("Your score is 2".to_string())
        );

        state.dismiss_result_and_continue().unwrap();
        assert_eq!(state.score(), 0);
        assert_eq!(state.phase(), Phase::AwaitingTap);
    }

    #[test]
    fn test_plain_dismiss_keeps_score() {
        let mut state = create_state(Variant::Plain, 9);
        tap_correct(&mut state);
        state.dismiss_result_and_continue().unwrap();
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_second_tap_is_ignored() {
        let mut state = create_state(Variant::Plain, 10);
        tap_correct(&mut state);
        let before = state.sync_message();
        let round_number = state.round_number();

        let wrong = wrong_index(&state);
        let correct = state.round().correct_answer();
        assert_eq!(tap(&mut state, wrong), Err(Error::InputDisabled));
        assert_eq!(tap(&mut state, correct), Err(Error::InputDisabled));
        assert_eq!(state.sync_message(), before);
        assert_eq!(state.score(), 1);
        assert_eq!(state.round_number(), round_number);
        assert_eq!(state.tally()[Verdict::Correct], 1);
    }

    #[test]
    fn test_out_of_range_tap_is_rejected() {
        let mut state = create_state(Variant::Plain, 11);
        assert_eq!(
            tap(&mut state, ROUND_SIZE),
            Err(Error::IndexOutOfRange {
                index: ROUND_SIZE,
                len: ROUND_SIZE
            })
        );
        assert_eq!(state.phase(), Phase::AwaitingTap);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_dismiss_starts_fresh_round() {
        let mut state = create_state(Variant::Plain, 12);
        let index = wrong_index(&state);
        tap(&mut state, index).unwrap();

        state.dismiss_result_and_continue().unwrap();
        assert_eq!(state.phase(), Phase::AwaitingTap);
        assert_eq!(state.round_number(), 2);
        assert!(state.last_result().is_none());
        assert!(state.notice().is_none());
        assert_eq!(state.countries().len(), ROUND_SIZE);
        assert!(state.elapsed_since_tap().is_none());
    }

    #[test]
    fn test_dismiss_without_result_is_rejected() {
        let mut state = create_state(Variant::Plain, 13);
        assert_eq!(
            state.dismiss_result_and_continue(),
            Err(Error::NothingToDismiss)
        );
        assert_eq!(state.round_number(), 1);
    }

    #[test]
    fn test_plain_notice_after_every_tap() {
        let mut state = create_state(Variant::Plain, 14);
        tap_correct(&mut state);
        let notice = state.notice().unwrap();
        assert_eq!(notice.title, "Correct");
        assert_eq!(notice.message, "Your score is 1");

        state.dismiss_result_and_continue().unwrap();
        let index = wrong_index(&state);
        let tapped = state.countries()[index].clone();
        tap(&mut state, index).unwrap();
        let notice = state.notice().unwrap();
        assert_eq!(notice.title, format!("Wrong! That's the flag of {tapped}"));
        assert_eq!(notice.message, "Your score is 0");
    }

    #[test]
    fn test_animated_notice_only_when_wrong() {
        let mut state = create_state(Variant::Animated, 15);
        tap_correct(&mut state);
        assert!(state.notice().is_none());
        assert_eq!(state.phase(), Phase::ShowingResult);
    }

    #[test]
    fn test_animated_correct_tap_schedules_advance() {
        let mut state = create_state(Variant::Animated, 16);
        let index = state.round().correct_answer();
        let mut scheduled = Vec::new();
        state
            .flag_tapped(index, |alarm, delay| scheduled.push((alarm, delay)))
            .unwrap();

        assert_eq!(
            scheduled,
            vec![(
                AlarmMessage::AdvanceRound { round: 1 },
                Duration::from_secs(2)
            )]
        );

        assert!(state.receive_alarm(&scheduled[0].0));
        assert_eq!(state.phase(), Phase::AwaitingTap);
        assert_eq!(state.round_number(), 2);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_wrong_tap_schedules_nothing() {
        let mut state = create_state(Variant::Animated, 17);
        let index = wrong_index(&state);
        let mut scheduled = Vec::new();
        state
            .flag_tapped(index, |alarm, delay| scheduled.push((alarm, delay)))
            .unwrap();
        assert!(scheduled.is_empty());
    }

    #[test]
    fn test_plain_correct_tap_schedules_nothing() {
        let mut state = create_state(Variant::Plain, 18);
        let index = state.round().correct_answer();
        let mut scheduled = Vec::new();
        state
            .flag_tapped(index, |alarm, delay| scheduled.push((alarm, delay)))
            .unwrap();
        assert!(scheduled.is_empty());
    }

    #[test]
    fn test_stale_alarm_is_ignored() {
        let mut state = create_state(Variant::Animated, 19);
        tap_correct(&mut state);
        assert!(state.receive_alarm(&AlarmMessage::AdvanceRound { round: 1 }));
        assert_eq!(state.round_number(), 2);

        assert!(!state.receive_alarm(&AlarmMessage::AdvanceRound { round: 1 }));
        assert_eq!(state.round_number(), 2);

        // Current round, but still awaiting a tap
        assert!(!state.receive_alarm(&AlarmMessage::AdvanceRound { round: 2 }));
        assert_eq!(state.round_number(), 2);
    }

    #[test]
    fn test_receive_message_reports_changes() {
        let mut state = create_state(Variant::Plain, 20);
        let index = state.round().correct_answer();

        assert!(!state.receive_message(&IncomingMessage::Dismiss, |_, _| ()));
        assert!(state.receive_message(&IncomingMessage::Tap(index), |_, _| ()));
        assert!(!state.receive_message(&IncomingMessage::Tap(index), |_, _| ()));
        assert!(state.receive_message(&IncomingMessage::Dismiss, |_, _| ()));
        assert!(!state.receive_message(&IncomingMessage::Tap(ROUND_SIZE + 4), |_, _| ()));
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_reduce() {
        let state = create_state(Variant::Animated, 21);
        let index = state.round().correct_answer();

        let (state, alarms) = state.reduce(&IncomingMessage::Tap(index));
        assert_eq!(state.score(), 1);
        assert_eq!(alarms.len(), 1);

        // No notice after a correct animated tap, so there is nothing to dismiss
        let (mut state, more) = state.reduce(&IncomingMessage::Dismiss);
        assert!(more.is_empty());
        assert_eq!(state.phase(), Phase::ShowingResult);
        assert_eq!(state.score(), 1);

        assert!(state.receive_alarm(&alarms[0].0));
        assert_eq!(state.phase(), Phase::AwaitingTap);
        assert_eq!(state.score(), 1);

        let index = wrong_index(&state);
        let (state, alarms) = state.reduce(&IncomingMessage::Tap(index));
        assert!(alarms.is_empty());
        let (state, _) = state.reduce(&IncomingMessage::Dismiss);
        assert_eq!(state.phase(), Phase::AwaitingTap);
        // Dismissing the wrong-answer notice resets the animated score
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_animated_streak_survives_dismiss_attempt() {
        let mut state = create_state(Variant::Animated, 8);
        for round in 1..=3 {
            tap_correct(&mut state);
            assert!(state.receive_alarm(&AlarmMessage::AdvanceRound { round }));
        }
        tap_correct(&mut state);
        assert_eq!(state.score(), 4);
        assert!(state.notice().is_none());

        assert_eq!(
            state.dismiss_result_and_continue(),
            Err(Error::NothingToDismiss)
        );
        assert_eq!(state.score(), 4);
        assert_eq!(state.round_number(), 4);
        assert_eq!(state.phase(), Phase::ShowingResult);
    }

    #[test]
    fn test_tally_counts_accepted_taps() {
        let mut state = create_state(Variant::Plain, 22);
        tap_correct(&mut state);
        state.dismiss_result_and_continue().unwrap();
        let index = wrong_index(&state);
        tap(&mut state, index).unwrap();
        state.dismiss_result_and_continue().unwrap();
        tap_correct(&mut state);

        assert_eq!(state.tally()[Verdict::Correct], 2);
        assert_eq!(state.tally()[Verdict::Wrong], 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let first = create_state(Variant::Plain, 23);
        let second = create_state(Variant::Plain, 23);
        assert_eq!(first.sync_message(), second.sync_message());
    }

    #[test]
    fn test_sync_message_hides_correct_answer() {
        let mut state = create_state(Variant::Plain, 24);
        let json = state.sync_message().to_message();
        assert!(json.contains("AwaitingTap"));
        assert!(json.contains(state.prompt()));
        assert!(!json.contains("correct_answer"));

        tap_correct(&mut state);
        let json = state.sync_message().to_message();
        assert!(json.contains("ShowingResult"));
        assert!(json.contains("Your score is 1"));
        assert!(!json.contains("correct_answer"));
    }

    #[test]
    fn test_sync_message_skips_missing_notice() {
        let mut state = create_state(Variant::Animated, 25);
        tap_correct(&mut state);
        let json = state.sync_message().to_message();
        assert!(json.contains("ShowingResult"));
        assert!(!json.contains("notice"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = Rules {
            wrong_resets_score: false,
            notice: NoticePolicy::Always,
            dismiss_resets_score: false,
            auto_advance: None,
        };
        let mut state = QuizState::with_rng(
            rules,
            CountryPool::new(["France", "Spain", "Italy"]).unwrap(),
            fastrand::Rng::with_seed(26),
        );
        tap_correct(&mut state);
        state.dismiss_result_and_continue().unwrap();
        let index = wrong_index(&state);
        tap(&mut state, index).unwrap();
        assert_eq!(state.score(), 1);
        assert!(state.notice().is_some());
        state.dismiss_result_and_continue().unwrap();
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InputDisabled.to_string(),
            "input is disabled until the round moves on"
        );
        assert_eq!(
            Error::IndexOutOfRange { index: 5, len: 3 }.to_string(),
            "flag 5 does not exist, the round shows 3 flags"
        );
        assert_eq!(
            Error::NothingToDismiss.to_string(),
            "there is no notice to dismiss"
        );
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Correct.to_string(), "Correct");
        assert_eq!(Verdict::Wrong.to_string(), "Wrong");
    }

    #[test]
    fn test_phase_default() {
        assert_eq!(Phase::default(), Phase::AwaitingTap);
    }
}
