use std::sync::Arc;
use std::time::Duration;

use pretty_duration::pretty_duration;
use rand::prelude::SliceRandom;
use time::OffsetDateTime;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{error, info, warn};

use crate::{
    common::duration::parse_duration,
    gateways::{
        AnnouncementDraft, ConclusionNotice, GatewayError, GiveawayStore, Notifier, RewardLedger,
    },
    models::giveaway::Giveaway,
};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("There is already an active giveaway")]
    AlreadyActive,
    #[error("There is no active giveaway")]
    NotActive,
    #[error("You have already joined this giveaway")]
    AlreadyJoined,
    #[error("`{0}` is not a valid duration")]
    InvalidDuration(String),
    #[error("{0}")]
    InvalidParams(&'static str),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConcludeMode {
    /// The armed timer fired.
    Expire,
    /// A staff member ended the giveaway early.
    Forced,
    /// Draw fresh winners without tearing the giveaway down.
    Reroll,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Idle,
    Active,
    Concluding,
}

pub struct StartGiveaway {
    pub channel_id: i64,
    pub prize: i64,
    pub winners: i32,
    pub host_id: i64,
    pub image: Option<String>,
    pub duration: String,
}

struct EngineState {
    phase: Phase,
    giveaway: Option<Giveaway>,
    timer: Option<JoinHandle<()>>,
}

/// Owns the single active giveaway and everything that may mutate it.
///
/// All operations run behind one async mutex that is held across gateway
/// calls, so `start`, `join` and the conclusion paths never interleave. The
/// expiry timer is a plain tokio task holding a reference back to the
/// engine; its handle lives in `EngineState` so a forced end can cancel it.
pub struct GiveawayEngine {
    store: Arc<dyn GiveawayStore>,
    notifier: Arc<dyn Notifier>,
    ledger: Arc<dyn RewardLedger>,
    state: Mutex<EngineState>,
}

impl GiveawayEngine {
    pub fn new(
        store: Arc<dyn GiveawayStore>,
        notifier: Arc<dyn Notifier>,
        ledger: Arc<dyn RewardLedger>,
    ) -> Self {
        GiveawayEngine {
            store,
            notifier,
            ledger,
            state: Mutex::new(EngineState {
                phase: Phase::Idle,
                giveaway: None,
                timer: None,
            }),
        }
    }

    pub async fn start(self: &Arc<Self>, params: StartGiveaway) -> Result<Giveaway, EngineError> {
        if params.prize <= 0 {
            return Err(EngineError::InvalidParams("The prize must be a positive amount"));
        }
        if params.winners <= 0 {
            return Err(EngineError::InvalidParams("The winner count must be a positive amount"));
        }
        let Some(duration) = parse_duration(&params.duration) else {
            return Err(EngineError::InvalidDuration(params.duration));
        };

        let mut state = self.state.lock().await;
        if state.giveaway.is_some() {
            return Err(EngineError::AlreadyActive);
        }

        let ends_at = OffsetDateTime::now_utc() + duration;
        let draft = AnnouncementDraft {
            prize: params.prize,
            winners: params.winners,
            host_id: params.host_id,
            image: params.image.clone(),
            ends_at,
        };
        let announcement_id = self
            .notifier
            .post_announcement(params.channel_id, &draft)
            .await?;

        let giveaway = Giveaway {
            id: announcement_id,
            channel_id: params.channel_id,
            prize: params.prize,
            winners: params.winners,
            host_id: params.host_id,
            image: params.image,
            ends_at,
            participants: Vec::new(),
        };
        if let Err(err) = self.store.insert(&giveaway).await {
            warn!(
                "Could not persist giveaway {}, the announcement message is orphaned. Failed with error: {}",
                giveaway.id, err
            );
            return Err(EngineError::Gateway(err));
        }

        state.phase = Phase::Active;
        state.giveaway = Some(giveaway.clone());
        state.timer = Some(self.arm_timer(duration));
        info!(
            "Giveaway {} started in channel {}, ending in {}",
            giveaway.id,
            giveaway.channel_id,
            pretty_duration(&duration, None)
        );
        Ok(giveaway)
    }

    pub async fn join(&self, user_id: i64) -> Result<(), EngineError> {
        let mut state = self.state.lock().await;
        if state.phase != Phase::Active {
            return Err(EngineError::NotActive);
        }
        let Some(giveaway) = state.giveaway.as_mut() else {
            return Err(EngineError::NotActive);
        };
        if giveaway.participants.contains(&user_id) {
            return Err(EngineError::AlreadyJoined);
        }

        giveaway.participants.push(user_id);
        let giveaway_id = giveaway.id;
        if let Err(err) = self.store.append_participant(giveaway_id, user_id).await {
            // Roll the entry back out so memory and storage stay in step.
            giveaway.participants.pop();
            warn!(
                "Could not persist entry of user {} for giveaway {}, dropping it. Failed with error: {}",
                user_id, giveaway_id, err
            );
            return Err(EngineError::Gateway(err));
        }
        Ok(())
    }

    /// Draws winners, credits them and announces the outcome. Outside of
    /// reroll mode the giveaway is then torn down: record deleted, in-memory
    /// reference cleared, timer invalidated. Holding the state mutex for the
    /// whole operation makes conclusion at-most-once; whoever loses the race
    /// between a forced end and the timer gets `NotActive`.
    pub async fn conclude(&self, mode: ConcludeMode) -> Result<Vec<i64>, EngineError> {
        let mut state = self.state.lock().await;
        let Some(giveaway) = state.giveaway.clone() else {
            return Err(EngineError::NotActive);
        };
        state.phase = Phase::Concluding;

        let winners = {
            let mut rng = rand::thread_rng();
            if giveaway.participants.len() > giveaway.winners as usize {
                giveaway
                    .participants
                    .choose_multiple(&mut rng, giveaway.winners as usize)
                    .copied()
                    .collect::<Vec<_>>()
            } else {
                giveaway.participants.clone()
            }
        };

        if winners.is_empty() {
            info!("Giveaway {} concluded without any participants", giveaway.id);
        }
        for winner in &winners {
            if let Err(err) = self.ledger.credit(*winner, giveaway.prize).await {
                error!(
                    "Could not credit {} to winner {} of giveaway {}. Failed with error: {}",
                    giveaway.prize, winner, giveaway.id, err
                );
            }
        }

        let notice = ConclusionNotice {
            prize: giveaway.prize,
            host_id: giveaway.host_id,
            image: giveaway.image.clone(),
            winners: winners.clone(),
            rerolled: mode == ConcludeMode::Reroll,
        };
        if let Err(err) = self.notifier.post_result(giveaway.channel_id, &notice).await {
            warn!(
                "Could not announce the outcome of giveaway {}. Failed with error: {}",
                giveaway.id, err
            );
        }

        // A reroll keeps the giveaway running so it can be rolled again,
        // unless nobody joined and there is nothing left to ever draw from.
        if mode == ConcludeMode::Reroll && !winners.is_empty() {
            state.phase = Phase::Active;
            return Ok(winners);
        }

        if let Err(err) = self.store.delete(giveaway.id).await {
            warn!(
                "Could not delete giveaway {} from storage. Failed with error: {}",
                giveaway.id, err
            );
        }
        state.giveaway = None;
        state.phase = Phase::Idle;
        if let Some(timer) = state.timer.take() {
            // On the expiry path the timer task is the caller, so the handle
            // is only dropped, never aborted.
            if mode != ConcludeMode::Expire {
                timer.abort();
            }
        }
        info!("Giveaway {} concluded with winners {:?}", giveaway.id, winners);
        Ok(winners)
    }

    /// Restores a persisted giveaway after a restart. A deadline still in
    /// the future re-arms the timer for the remaining time; an elapsed one
    /// is concluded on the spot, winners drawn and credited as promised.
    pub async fn recover(self: &Arc<Self>) -> Result<(), EngineError> {
        let giveaway = match self.store.find_active().await? {
            Some(giveaway) => giveaway,
            None => {
                info!("No stored giveaway to restore");
                return Ok(());
            }
        };

        let remaining = giveaway.ends_at - OffsetDateTime::now_utc();
        {
            let mut state = self.state.lock().await;
            if state.giveaway.is_some() {
                // The gateway reconnected while a giveaway was running.
                return Ok(());
            }
            state.phase = Phase::Active;
            state.giveaway = Some(giveaway.clone());

            if remaining.is_positive() {
                let delay = Duration::from_millis(remaining.whole_milliseconds() as u64);
                state.timer = Some(self.arm_timer(delay));
                info!(
                    "Restored giveaway {} with {} participants, ending in {}",
                    giveaway.id,
                    giveaway.participants.len(),
                    pretty_duration(&delay, None)
                );
                return Ok(());
            }
        }

        info!("Giveaway {} expired while offline, concluding it now", giveaway.id);
        match self.conclude(ConcludeMode::Expire).await {
            Ok(_) | Err(EngineError::NotActive) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn arm_timer(self: &Arc<Self>, delay: Duration) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match engine.conclude(ConcludeMode::Expire).await {
                Ok(_) | Err(EngineError::NotActive) => {}
                Err(err) => {
                    error!("Could not conclude expired giveaway. Failed with error: {}", err);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::{ConcludeMode, EngineError, GiveawayEngine, Phase, StartGiveaway};
    use crate::gateways::{
        AnnouncementDraft, ConclusionNotice, GatewayError, GiveawayStore, Notifier, RewardLedger,
    };
    use crate::models::giveaway::Giveaway;

    struct MemoryStore {
        giveaway: StdMutex<Option<Giveaway>>,
        fail_appends: AtomicBool,
    }

    impl MemoryStore {
        fn new() -> Self {
            MemoryStore {
                giveaway: StdMutex::new(None),
                fail_appends: AtomicBool::new(false),
            }
        }

        fn seed(&self, giveaway: Giveaway) {
            *self.giveaway.lock().unwrap() = Some(giveaway);
        }

        fn stored(&self) -> Option<Giveaway> {
            self.giveaway.lock().unwrap().clone()
        }

        fn fail_appends(&self, fail: bool) {
            self.fail_appends.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl GiveawayStore for MemoryStore {
        async fn find_active(&self) -> Result<Option<Giveaway>, GatewayError> {
            Ok(self.stored())
        }

        async fn insert(&self, giveaway: &Giveaway) -> Result<(), GatewayError> {
            *self.giveaway.lock().unwrap() = Some(giveaway.clone());
            Ok(())
        }

        async fn append_participant(
            &self,
            giveaway_id: i64,
            user_id: i64,
        ) -> Result<(), GatewayError> {
            if self.fail_appends.load(Ordering::SeqCst) {
                return Err(GatewayError::Database(sqlx::Error::PoolClosed));
            }
            let mut guard = self.giveaway.lock().unwrap();
            if let Some(giveaway) = guard.as_mut() {
                if giveaway.id == giveaway_id && !giveaway.participants.contains(&user_id) {
                    giveaway.participants.push(user_id);
                }
            }
            Ok(())
        }

        async fn delete(&self, giveaway_id: i64) -> Result<(), GatewayError> {
            let mut guard = self.giveaway.lock().unwrap();
            if guard.as_ref().is_some_and(|giveaway| giveaway.id == giveaway_id) {
                *guard = None;
            }
            Ok(())
        }
    }

    struct FakeNotifier {
        next_message_id: AtomicI64,
        results: StdMutex<Vec<ConclusionNotice>>,
        announcements: StdMutex<Vec<AnnouncementDraft>>,
        channel_unavailable: AtomicBool,
    }

    impl FakeNotifier {
        fn new() -> Self {
            FakeNotifier {
                next_message_id: AtomicI64::new(1000),
                results: StdMutex::new(Vec::new()),
                announcements: StdMutex::new(Vec::new()),
                channel_unavailable: AtomicBool::new(false),
            }
        }

        fn results(&self) -> Vec<ConclusionNotice> {
            self.results.lock().unwrap().clone()
        }

        fn announcements(&self) -> Vec<AnnouncementDraft> {
            self.announcements.lock().unwrap().clone()
        }

        fn set_channel_unavailable(&self, unavailable: bool) {
            self.channel_unavailable.store(unavailable, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn post_announcement(
            &self,
            channel_id: i64,
            draft: &AnnouncementDraft,
        ) -> Result<i64, GatewayError> {
            if self.channel_unavailable.load(Ordering::SeqCst) {
                return Err(GatewayError::ChannelUnavailable(channel_id));
            }
            self.announcements.lock().unwrap().push(draft.clone());
            Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
        }

        async fn post_result(
            &self,
            channel_id: i64,
            notice: &ConclusionNotice,
        ) -> Result<(), GatewayError> {
            if self.channel_unavailable.load(Ordering::SeqCst) {
                return Err(GatewayError::ChannelUnavailable(channel_id));
            }
            self.results.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }

    struct FakeLedger {
        credits: StdMutex<Vec<(i64, i64)>>,
        failing: AtomicBool,
    }

    impl FakeLedger {
        fn new() -> Self {
            FakeLedger {
                credits: StdMutex::new(Vec::new()),
                failing: AtomicBool::new(false),
            }
        }

        fn credits(&self) -> Vec<(i64, i64)> {
            self.credits.lock().unwrap().clone()
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl RewardLedger for FakeLedger {
        async fn credit(&self, user_id: i64, amount: i64) -> Result<(), GatewayError> {
            self.credits.lock().unwrap().push((user_id, amount));
            if self.failing.load(Ordering::SeqCst) {
                return Err(GatewayError::Database(sqlx::Error::PoolClosed));
            }
            Ok(())
        }
    }

    fn setup() -> (
        Arc<GiveawayEngine>,
        Arc<MemoryStore>,
        Arc<FakeNotifier>,
        Arc<FakeLedger>,
    ) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(FakeNotifier::new());
        let ledger = Arc::new(FakeLedger::new());
        let engine = Arc::new(GiveawayEngine::new(
            store.clone(),
            notifier.clone(),
            ledger.clone(),
        ));
        (engine, store, notifier, ledger)
    }

    fn params(winners: i32, duration: &str) -> StartGiveaway {
        StartGiveaway {
            channel_id: 77,
            prize: 500,
            winners,
            host_id: 9,
            image: None,
            duration: duration.to_string(),
        }
    }

    fn stored_giveaway(ends_in: time::Duration, participants: Vec<i64>, winners: i32) -> Giveaway {
        Giveaway {
            id: 4242,
            channel_id: 77,
            prize: 250,
            winners,
            host_id: 9,
            image: None,
            ends_at: OffsetDateTime::now_utc() + ends_in,
            participants,
        }
    }

    // Lets spawned timer tasks run on the current-thread test runtime.
    async fn settle() {
        for _ in 0..25 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_start_rejects_second_giveaway_until_concluded() {
        let (engine, store, notifier, _ledger) = setup();

        engine.start(params(1, "1h")).await.unwrap();
        let result = engine.start(params(1, "1h")).await;
        assert!(matches!(result, Err(EngineError::AlreadyActive)));
        assert_eq!(notifier.announcements().len(), 1);

        engine.conclude(ConcludeMode::Forced).await.unwrap();
        assert!(store.stored().is_none());

        engine.start(params(1, "1h")).await.unwrap();
        assert_eq!(notifier.announcements().len(), 2);
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_params() {
        let (engine, _store, notifier, _ledger) = setup();

        let mut zero_prize = params(1, "1h");
        zero_prize.prize = 0;
        assert!(matches!(
            engine.start(zero_prize).await,
            Err(EngineError::InvalidParams(_))
        ));

        assert!(matches!(
            engine.start(params(0, "1h")).await,
            Err(EngineError::InvalidParams(_))
        ));
        assert!(matches!(
            engine.start(params(1, "10x")).await,
            Err(EngineError::InvalidDuration(_))
        ));
        assert!(matches!(
            engine.start(params(1, "0s")).await,
            Err(EngineError::InvalidDuration(_))
        ));

        assert!(notifier.announcements().is_empty());
        assert!(engine.state.lock().await.giveaway.is_none());
    }

    #[tokio::test]
    async fn test_join_rejects_duplicates() {
        let (engine, store, _notifier, _ledger) = setup();
        engine.start(params(1, "1h")).await.unwrap();

        engine.join(1).await.unwrap();
        let result = engine.join(1).await;
        assert!(matches!(result, Err(EngineError::AlreadyJoined)));

        assert_eq!(store.stored().unwrap().participants, vec![1]);
        assert_eq!(
            engine.state.lock().await.giveaway.as_ref().unwrap().participants,
            vec![1]
        );
    }

    #[tokio::test]
    async fn test_join_requires_active_giveaway() {
        let (engine, _store, _notifier, _ledger) = setup();
        assert!(matches!(engine.join(1).await, Err(EngineError::NotActive)));
    }

    #[tokio::test]
    async fn test_join_rolls_back_on_storage_failure() {
        let (engine, store, _notifier, _ledger) = setup();
        engine.start(params(1, "1h")).await.unwrap();

        store.fail_appends(true);
        let result = engine.join(5).await;
        assert!(matches!(result, Err(EngineError::Gateway(_))));
        assert!(engine
            .state
            .lock()
            .await
            .giveaway
            .as_ref()
            .unwrap()
            .participants
            .is_empty());
        assert!(store.stored().unwrap().participants.is_empty());

        store.fail_appends(false);
        engine.join(5).await.unwrap();
        assert_eq!(store.stored().unwrap().participants, vec![5]);
    }

    #[tokio::test]
    async fn test_draw_caps_winners_at_participant_count() {
        let (engine, _store, _notifier, ledger) = setup();
        engine.start(params(5, "1h")).await.unwrap();
        engine.join(1).await.unwrap();
        engine.join(2).await.unwrap();

        let mut winners = engine.conclude(ConcludeMode::Forced).await.unwrap();
        winners.sort_unstable();
        assert_eq!(winners, vec![1, 2]);
        assert_eq!(ledger.credits().len(), 2);
    }

    #[tokio::test]
    async fn test_draw_selects_distinct_participants() {
        let (engine, _store, _notifier, ledger) = setup();
        engine.start(params(3, "1h")).await.unwrap();
        for user_id in 1..=10 {
            engine.join(user_id).await.unwrap();
        }

        let mut winners = engine.conclude(ConcludeMode::Forced).await.unwrap();
        assert_eq!(winners.len(), 3);
        winners.sort_unstable();
        winners.dedup();
        assert_eq!(winners.len(), 3);
        for winner in &winners {
            assert!((1..=10).contains(winner));
        }
        assert_eq!(ledger.credits().len(), 3);
    }

    #[tokio::test]
    async fn test_conclude_without_participants_skips_ledger() {
        let (engine, store, notifier, ledger) = setup();
        engine.start(params(2, "1h")).await.unwrap();

        let winners = engine.conclude(ConcludeMode::Forced).await.unwrap();
        assert!(winners.is_empty());
        assert!(ledger.credits().is_empty());
        assert!(store.stored().is_none());
        assert!(engine.state.lock().await.giveaway.is_none());

        let results = notifier.results();
        assert_eq!(results.len(), 1);
        assert!(results[0].winners.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_conclude_runs_at_most_once() {
        let (engine, _store, notifier, ledger) = setup();
        engine.start(params(2, "1h")).await.unwrap();
        engine.join(1).await.unwrap();
        engine.join(2).await.unwrap();
        engine.join(3).await.unwrap();

        let winners = engine.conclude(ConcludeMode::Forced).await.unwrap();
        assert_eq!(winners.len(), 2);
        assert!(matches!(
            engine.conclude(ConcludeMode::Forced).await,
            Err(EngineError::NotActive)
        ));
        assert_eq!(ledger.credits().len(), 2);

        // The armed timer was cancelled, so the deadline passing must not
        // draw or credit a second time.
        tokio::time::advance(Duration::from_secs(2 * 60 * 60)).await;
        settle().await;
        assert_eq!(ledger.credits().len(), 2);
        assert_eq!(notifier.results().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_expiry_concludes_giveaway() {
        let (engine, store, notifier, ledger) = setup();
        engine.start(params(1, "45s")).await.unwrap();
        engine.join(11).await.unwrap();
        engine.join(12).await.unwrap();

        settle().await;
        tokio::time::advance(Duration::from_secs(46)).await;
        settle().await;

        assert!(store.stored().is_none());
        assert!(engine.state.lock().await.giveaway.is_none());
        assert_eq!(ledger.credits().len(), 1);
        assert_eq!(notifier.results().len(), 1);
    }

    #[tokio::test]
    async fn test_reroll_keeps_giveaway_active() {
        let (engine, store, notifier, ledger) = setup();
        engine.start(params(1, "1h")).await.unwrap();
        engine.join(1).await.unwrap();
        engine.join(2).await.unwrap();
        engine.join(3).await.unwrap();

        let first = engine.conclude(ConcludeMode::Reroll).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(store.stored().is_some());
        {
            let state = engine.state.lock().await;
            assert_eq!(state.phase, Phase::Active);
            assert!(state.giveaway.is_some());
        }

        let second = engine.conclude(ConcludeMode::Reroll).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(ledger.credits().len(), 2);

        let results = notifier.results();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|notice| notice.rerolled));

        engine.conclude(ConcludeMode::Forced).await.unwrap();
        assert!(store.stored().is_none());
        assert!(!notifier.results()[2].rerolled);
    }

    #[tokio::test]
    async fn test_reroll_without_participants_tears_down() {
        let (engine, store, notifier, ledger) = setup();
        engine.start(params(1, "1h")).await.unwrap();

        let winners = engine.conclude(ConcludeMode::Reroll).await.unwrap();
        assert!(winners.is_empty());
        assert!(store.stored().is_none());
        assert!(engine.state.lock().await.giveaway.is_none());
        assert!(ledger.credits().is_empty());
        assert_eq!(notifier.results().len(), 1);
    }

    #[tokio::test]
    async fn test_channel_unavailable_still_pays_and_cleans_up() {
        let (engine, store, notifier, ledger) = setup();
        engine.start(params(1, "1h")).await.unwrap();
        engine.join(1).await.unwrap();

        notifier.set_channel_unavailable(true);
        let winners = engine.conclude(ConcludeMode::Forced).await.unwrap();
        assert_eq!(winners, vec![1]);
        assert_eq!(ledger.credits(), vec![(1, 500)]);
        assert!(store.stored().is_none());
        assert!(notifier.results().is_empty());
    }

    #[tokio::test]
    async fn test_ledger_failures_do_not_abort_conclusion() {
        let (engine, store, notifier, ledger) = setup();
        engine.start(params(2, "1h")).await.unwrap();
        engine.join(1).await.unwrap();
        engine.join(2).await.unwrap();

        ledger.set_failing(true);
        let winners = engine.conclude(ConcludeMode::Forced).await.unwrap();
        assert_eq!(winners.len(), 2);
        // Every winner was attempted despite the failures, and the outcome
        // was still announced and cleaned up.
        assert_eq!(ledger.credits().len(), 2);
        assert_eq!(notifier.results().len(), 1);
        assert!(store.stored().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recover_rearms_timer_for_remaining_time() {
        let (engine, store, _notifier, ledger) = setup();
        store.seed(stored_giveaway(time::Duration::minutes(5), vec![1, 2, 3], 1));

        engine.recover().await.unwrap();
        {
            let state = engine.state.lock().await;
            assert_eq!(state.phase, Phase::Active);
            assert_eq!(state.giveaway.as_ref().unwrap().id, 4242);
        }

        settle().await;
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        settle().await;
        assert!(store.stored().is_some());
        assert!(ledger.credits().is_empty());

        tokio::time::advance(Duration::from_secs(90)).await;
        settle().await;
        assert!(store.stored().is_none());
        assert_eq!(ledger.credits().len(), 1);
    }

    #[tokio::test]
    async fn test_recover_concludes_elapsed_giveaway() {
        let (engine, store, notifier, ledger) = setup();
        store.seed(stored_giveaway(time::Duration::minutes(-1), vec![1, 2], 1));

        engine.recover().await.unwrap();

        assert!(store.stored().is_none());
        assert!(engine.state.lock().await.giveaway.is_none());
        assert_eq!(ledger.credits().len(), 1);
        assert_eq!(notifier.results().len(), 1);
    }

    #[tokio::test]
    async fn test_recover_with_empty_store_is_a_noop() {
        let (engine, _store, notifier, _ledger) = setup();
        engine.recover().await.unwrap();
        assert!(engine.state.lock().await.giveaway.is_none());
        assert!(notifier.results().is_empty());
    }

    #[tokio::test]
    async fn test_recover_skips_when_already_active() {
        let (engine, _store, notifier, _ledger) = setup();
        let started = engine.start(params(1, "1h")).await.unwrap();

        engine.recover().await.unwrap();
        assert_eq!(
            engine.state.lock().await.giveaway.as_ref().unwrap().id,
            started.id
        );
        assert_eq!(notifier.announcements().len(), 1);
    }

    #[tokio::test]
    async fn test_join_rejected_while_not_active_after_conclusion() {
        let (engine, _store, _notifier, _ledger) = setup();
        engine.start(params(1, "1h")).await.unwrap();
        engine.join(1).await.unwrap();
        engine.conclude(ConcludeMode::Forced).await.unwrap();

        assert!(matches!(engine.join(2).await, Err(EngineError::NotActive)));
    }
}
