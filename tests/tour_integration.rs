//! Tour integration tests.
//!
//! Each test builds a world with [`game::setup`], drives it with the real
//! update schedule one tick at a time, and watches what the orchestrator
//! asks of a recording [`BundleLoader`].
//!
//! # Usage
//!
//! ```sh
//! cargo test --test tour_integration
//! ```

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use scenetour::components::exempt::Exempt;
use scenetour::components::fader::Fader;
use scenetour::components::indicator::Indicator;
use scenetour::components::scenemember::SceneMember;
use scenetour::components::selectable::Selectable;
use scenetour::error::TourError;
use scenetour::events::tour::{
    AdvanceTourEvent, ObjectSelectedEvent, ResetTourEvent, TourStepEnteredEvent,
};
use scenetour::game;
use scenetour::resources::approot::AppRoot;
use scenetour::resources::freelook::FreeLookCamera;
use scenetour::resources::loader::{BundleLoader, BundleOp};
use scenetour::resources::manifest::{BundleManifest, EntitySpec};
use scenetour::resources::manifestloader::ManifestLoader;
use scenetour::resources::palette::IndicatorPalette;
use scenetour::resources::tour::{Tour, TransitionKind, TransitionPhase};
use scenetour::resources::tourconfig::TourConfig;
use scenetour::resources::tourplan::{TourPlan, TourState};
use scenetour::systems::bundle::despawn_bundle;
use scenetour::systems::preserve::on_object_selected;
use scenetour::systems::time::update_world_time;

const DT: f32 = 0.05;
const FADE: f32 = 0.1;

type CallLog = Arc<Mutex<Vec<String>>>;

// =============================================================================
// Test doubles and harness
// =============================================================================

/// Records every load/unload and finishes each on the next poll. Loads spawn
/// `faders` hidden fadeable entities owned by the bundle.
struct RecordingLoader {
    calls: CallLog,
    faders: usize,
    queued: Vec<(bool, String, BundleOp)>,
}

impl BundleLoader for RecordingLoader {
    fn begin_load(&mut self, id: &str) -> BundleOp {
        self.calls.lock().unwrap().push(format!("load:{id}"));
        let op = BundleOp::pending();
        self.queued.push((true, id.to_string(), op.clone()));
        op
    }

    fn begin_unload(&mut self, id: &str) -> BundleOp {
        self.calls.lock().unwrap().push(format!("unload:{id}"));
        let op = BundleOp::pending();
        self.queued.push((false, id.to_string(), op.clone()));
        op
    }

    fn poll(&mut self, world: &mut World) {
        for (is_load, id, op) in std::mem::take(&mut self.queued) {
            if is_load {
                for _ in 0..self.faders {
                    world.spawn((SceneMember::new(id.as_str()), Fader::new(FADE)));
                }
            } else {
                despawn_bundle(world, &id);
            }
            op.complete();
        }
    }
}

#[derive(Resource, Default)]
struct Entered(Vec<(TourState, TransitionKind)>);

fn record_entered(trigger: On<TourStepEnteredEvent>, mut entered: ResMut<Entered>) {
    let event = trigger.event();
    entered.0.push((event.to, event.kind));
}

struct Harness {
    world: World,
    update: Schedule,
    calls: CallLog,
}

fn config_for(bundles: &[&str]) -> TourConfig {
    let mut config = TourConfig::new();
    config.steps = TourPlan::from_bundles(bundles.iter().copied())
        .unwrap()
        .steps()
        .to_vec();
    config.fade_duration = FADE;
    config
}

impl Harness {
    fn new(bundles: &[&str], faders: usize) -> Self {
        Self::with_config(config_for(bundles), faders)
    }

    fn with_config(config: TourConfig, faders: usize) -> Self {
        let calls = CallLog::default();
        let loader = RecordingLoader {
            calls: calls.clone(),
            faders,
            queued: Vec::new(),
        };
        Self::with_loader(config, loader, calls)
    }

    fn with_loader(config: TourConfig, loader: impl BundleLoader + 'static, calls: CallLog) -> Self {
        let mut world = World::new();
        game::setup(&mut world, &config, loader).unwrap();
        world.insert_resource(Entered::default());
        world.add_observer(record_entered);
        world.flush();
        Harness {
            world,
            update: game::update_schedule(),
            calls,
        }
    }

    fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.update.run(&mut self.world);
    }

    fn run_until_idle(&mut self) -> u32 {
        let mut ticks = 0;
        loop {
            self.tick(DT);
            ticks += 1;
            if self.tour().is_idle() {
                return ticks;
            }
            assert!(ticks < 10_000, "transition never finished");
        }
    }

    fn advance(&mut self) {
        self.world.trigger(AdvanceTourEvent {});
        self.run_until_idle();
    }

    fn tour(&self) -> &Tour {
        self.world.resource::<Tour>()
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn entered(&self) -> Vec<(TourState, TransitionKind)> {
        self.world.resource::<Entered>().0.clone()
    }

    fn count_members(&mut self, bundle: &str) -> usize {
        self.world
            .query::<&SceneMember>()
            .iter(&self.world)
            .filter(|m| m.is(bundle))
            .count()
    }

    fn phase_name(&self) -> Option<&'static str> {
        self.tour().transition().map(|t| t.phase.name())
    }
}

// =============================================================================
// Sequencing
// =============================================================================

#[test]
fn three_advances_load_and_unload_in_order() {
    let mut h = Harness::new(&["A", "B", "C"], 2);
    h.advance();
    h.advance();
    h.advance();

    assert_eq!(
        h.calls(),
        vec!["load:A", "load:B", "unload:A", "load:C", "unload:B"]
    );
    assert_eq!(h.tour().current(), TourState::Step(2));
    assert_eq!(h.tour().transitions_completed(), 3);
    assert_eq!(
        h.entered(),
        vec![
            (TourState::Step(0), TransitionKind::Advance),
            (TourState::Step(1), TransitionKind::Advance),
            (TourState::Step(2), TransitionKind::Advance),
        ]
    );
}

#[test]
fn leaving_start_never_unloads() {
    let mut h = Harness::new(&["A", "B"], 1);
    h.advance();
    assert_eq!(h.calls(), vec!["load:A"]);
    assert_eq!(h.tour().current(), TourState::Step(0));
}

#[test]
fn new_content_is_fully_visible_and_old_content_gone() {
    let mut h = Harness::new(&["A", "B"], 3);
    h.advance();
    h.advance();

    assert_eq!(h.count_members("A"), 0);
    assert_eq!(h.count_members("B"), 3);
    for fader in h.world.query::<&Fader>().iter(&h.world) {
        assert!(!fader.is_fading());
        assert_eq!(fader.opacity(), 1.0);
    }
}

#[test]
fn state_commits_before_fade_in_finishes() {
    let mut h = Harness::new(&["A"], 1);
    h.world.trigger(AdvanceTourEvent {});
    while h.phase_name() != Some("fading_in") {
        h.tick(DT);
        assert!(h.tour().transition().is_some());
    }
    assert_eq!(h.tour().current(), TourState::Step(0));
    assert!(!h.tour().is_idle());
}

#[test]
fn jump_bypasses_next_rule() {
    let mut h = Harness::new(&["A", "B", "C"], 1);
    h.advance();
    h.world
        .resource_mut::<Tour>()
        .request_jump(TourState::Step(2))
        .unwrap();
    h.run_until_idle();

    assert_eq!(h.calls(), vec!["load:A", "load:C", "unload:A"]);
    assert_eq!(h.tour().current(), TourState::Step(2));
    assert_eq!(h.entered().last().unwrap().1, TransitionKind::Jump);
}

// =============================================================================
// Requests
// =============================================================================

#[test]
fn advance_past_last_step_is_rejected_without_panic() {
    let mut h = Harness::new(&["A", "B"], 1);
    h.advance();
    h.advance();

    let err = h.world.resource_mut::<Tour>().request_advance().unwrap_err();
    assert_eq!(err, TourError::EndOfTour(TourState::Step(1)));

    // Through the event path the rejection is only logged.
    h.world.trigger(AdvanceTourEvent {});
    assert!(h.tour().is_idle());
    h.tick(DT);
    assert_eq!(h.tour().current(), TourState::Step(1));
    assert_eq!(h.calls().len(), 3);
}

#[test]
fn requests_while_busy_are_rejected() {
    let mut h = Harness::new(&["A", "B", "C"], 2);
    h.world.trigger(AdvanceTourEvent {});
    h.tick(DT);
    assert!(h.tour().transition().is_some());

    let err = h.world.resource_mut::<Tour>().request_advance().unwrap_err();
    assert_eq!(err, TourError::Busy(TourState::Step(0)));
    h.world.trigger(ResetTourEvent {});
    assert!(h.tour().pending().is_none());

    let stray = h.world.spawn(Fader::new(FADE)).id();
    assert!(matches!(
        on_object_selected(&mut h.world, stray),
        Err(TourError::Busy(_))
    ));
    assert!(h.world.get::<Exempt>(stray).is_none());

    h.run_until_idle();
    assert_eq!(h.tour().current(), TourState::Step(0));
    assert_eq!(h.tour().transitions_completed(), 1);
}

// =============================================================================
// Fade barrier and sweep
// =============================================================================

#[test]
fn stuck_fade_out_gives_up_after_exactly_max_ticks() {
    let mut config = config_for(&["A"]);
    config.barrier_max_ticks = 5;
    let mut h = Harness::with_config(config, 1);
    let stuck = h.world.spawn(Fader::new(FADE).visible()).id();

    h.world.trigger(AdvanceTourEvent {});
    for waited in 1..=5 {
        // A zero delta means no fader ever makes progress.
        h.tick(0.0);
        let transition = h.tour().transition().unwrap();
        match &transition.phase {
            TransitionPhase::FadingOut(barrier) => assert_eq!(barrier.ticks(), waited),
            other => panic!("left fade-out early in {}", other.name()),
        }
    }

    h.tick(0.0);
    assert_eq!(h.phase_name(), Some("loading"));
    assert!(h.world.get_entity(stuck).is_err());

    // The fade-in is stuck too and gives up the same way.
    let mut ticks = 0;
    while !h.tour().is_idle() {
        h.tick(0.0);
        ticks += 1;
        assert!(ticks <= 10, "stuck fade-in was never abandoned");
    }
    assert_eq!(h.tour().current(), TourState::Step(0));
}

#[test]
fn sweep_spares_exactly_the_exempt_entities() {
    let mut h = Harness::new(&["A"], 0);
    let doomed: Vec<Entity> = (0..7)
        .map(|_| h.world.spawn(Fader::new(FADE).visible()).id())
        .collect();
    let spared: Vec<Entity> = (0..3)
        .map(|_| h.world.spawn((Fader::new(FADE).visible(), Exempt)).id())
        .collect();

    h.advance();

    for e in doomed {
        assert!(h.world.get_entity(e).is_err());
    }
    for e in spared {
        let fader = h.world.get::<Fader>(e).unwrap();
        assert_eq!(fader.opacity(), 1.0);
        assert!(!fader.is_fading());
    }
}

#[test]
fn content_spawned_during_fade_out_is_swept_unfaded() {
    let mut h = Harness::new(&["A", "B"], 1);
    h.advance();
    h.world.trigger(AdvanceTourEvent {});
    h.tick(DT);
    assert_eq!(h.phase_name(), Some("fading_out"));

    let late = h.world.spawn(Fader::new(FADE).visible()).id();
    h.run_until_idle();
    assert!(h.world.get_entity(late).is_err());
}

// =============================================================================
// Side effects
// =============================================================================

#[test]
fn steps_toggle_camera_and_reset_sends_it_home() {
    let mut h = Harness::new(&["A", "B", "C"], 1);
    h.advance();
    assert!(!h.world.resource::<FreeLookCamera>().enabled);
    h.advance();
    assert!(h.world.resource::<FreeLookCamera>().enabled);
    h.advance();

    h.world.trigger(ResetTourEvent {});
    h.run_until_idle();

    let camera = *h.world.resource::<FreeLookCamera>();
    assert!(!camera.enabled);
    assert!(camera.return_to_origin);
    assert_eq!(h.tour().current(), TourState::Step(0));
    assert_eq!(h.tour().resets_completed(), 1);
    assert_eq!(h.calls()[5..].to_vec(), vec!["load:A", "unload:C"]);
    assert_eq!(h.entered().last().unwrap().1, TransitionKind::Reset);
}

#[test]
fn camera_flag_is_only_raised_after_fade_in() {
    let mut h = Harness::new(&["A", "B"], 1);
    h.advance();
    h.advance();
    h.world.trigger(ResetTourEvent {});
    while h.phase_name() != Some("fading_in") {
        h.tick(DT);
        assert!(!h.world.resource::<FreeLookCamera>().return_to_origin);
    }
    h.run_until_idle();
    assert!(h.world.resource::<FreeLookCamera>().return_to_origin);
}

#[test]
fn indicator_transition_is_not_awaited() {
    let mut config = config_for(&["A", "B"]);
    config.indicator_duration = 1_000.0;
    let mut h = Harness::with_config(config, 1);
    h.advance();
    h.advance();

    let highlight = h.world.resource::<IndicatorPalette>().highlight;
    let mut indicators: Vec<Indicator> = h
        .world
        .query::<&Indicator>()
        .iter(&h.world)
        .cloned()
        .collect();
    indicators.sort_by_key(|i| i.index);
    assert_eq!(indicators.len(), 2);
    assert!(indicators.iter().all(|i| i.is_transitioning()));
    assert_eq!(indicators[1].transition.unwrap().to, highlight);
    assert_ne!(indicators[0].transition.unwrap().to, highlight);
}

// =============================================================================
// Preservation
// =============================================================================

fn planets_harness() -> Harness {
    let a = BundleManifest::new(vec![
        EntitySpec::new()
            .fading()
            .child(EntitySpec::new().fading().with_outline().selectable("Earth", "6371 km"))
            .child(EntitySpec::new().fading().with_outline().selectable("Mars", "3389.5 km")),
    ]);
    let b = BundleManifest::new(vec![EntitySpec::new().fading()]);
    let loader = ManifestLoader::new()
        .with_fade_duration(FADE)
        .with_manifest("A", a)
        .with_manifest("B", b);
    Harness::with_loader(config_for(&["A", "B"]), loader, CallLog::default())
}

fn find_planet(world: &mut World, name: &str) -> Entity {
    world
        .query::<(Entity, &Selectable)>()
        .iter(world)
        .find(|(_, s)| s.name == name)
        .map(|(e, _)| e)
        .unwrap()
}

#[test]
fn selected_object_survives_its_scene() {
    let mut h = planets_harness();
    h.advance();
    let earth = find_planet(&mut h.world, "Earth");
    let mars = find_planet(&mut h.world, "Mars");
    let group = h.world.get::<ChildOf>(earth).unwrap().parent();
    let root = h.world.resource::<AppRoot>().0;

    h.world.trigger(ObjectSelectedEvent { entity: earth });
    h.world.flush();
    assert!(h.world.get::<Exempt>(earth).is_some());
    assert_eq!(h.world.get::<ChildOf>(earth).unwrap().parent(), root);

    h.run_until_idle();

    assert_eq!(h.tour().current(), TourState::Step(1));
    assert!(h.world.get_entity(group).is_err());
    assert!(h.world.get_entity(mars).is_err());
    assert!(h.world.get_entity(earth).is_ok());
    assert!(h.world.get::<Exempt>(earth).is_none());
    assert!(h.world.get::<SceneMember>(earth).is_none());
    assert_eq!(h.world.get::<ChildOf>(earth).unwrap().parent(), root);
    assert!(h.world.get::<Selectable>(earth).unwrap().selected);
    assert_eq!(h.world.get::<Fader>(earth).unwrap().opacity(), 1.0);
    assert_eq!(
        h.entered().last().unwrap(),
        &(TourState::Step(1), TransitionKind::Preserve(earth))
    );
}

#[test]
fn carried_object_is_swept_by_the_next_switch() {
    let mut h = planets_harness();
    h.advance();
    let earth = find_planet(&mut h.world, "Earth");
    h.world.trigger(ObjectSelectedEvent { entity: earth });
    h.world.flush();
    h.run_until_idle();

    h.world.trigger(ResetTourEvent {});
    h.run_until_idle();

    assert_eq!(h.tour().current(), TourState::Step(0));
    assert!(h.world.get_entity(earth).is_err());
    assert_eq!(h.count_members("A"), 3);
    assert_eq!(h.count_members("B"), 0);
}

#[test]
fn selecting_on_last_step_changes_nothing() {
    let mut h = planets_harness();
    h.advance();
    h.advance();
    let panel = h
        .world
        .query_filtered::<Entity, With<Fader>>()
        .iter(&h.world)
        .next()
        .unwrap();

    assert_eq!(
        on_object_selected(&mut h.world, panel),
        Err(TourError::EndOfTour(TourState::Step(1)))
    );
    assert!(h.world.get::<Exempt>(panel).is_none());
    assert!(h.world.get::<SceneMember>(panel).is_some());
}

// =============================================================================
// Re-entering the current step
// =============================================================================

fn two_step_harness() -> Harness {
    let a = BundleManifest::new(vec![EntitySpec::new().fading(), EntitySpec::new().fading()]);
    let b = BundleManifest::new(vec![EntitySpec::new().fading()]);
    let loader = ManifestLoader::new()
        .with_fade_duration(FADE)
        .with_manifest("A", a)
        .with_manifest("B", b);
    Harness::with_loader(config_for(&["A", "B"]), loader, CallLog::default())
}

fn members_of(world: &mut World, bundle: &str) -> Vec<Entity> {
    world
        .query::<(Entity, &SceneMember)>()
        .iter(world)
        .filter(|(_, m)| m.is(bundle))
        .map(|(e, _)| e)
        .collect()
}

#[test]
fn reset_on_first_step_keeps_fresh_content() {
    let mut h = two_step_harness();
    h.advance();
    let old = members_of(&mut h.world, "A");
    assert_eq!(old.len(), 2);

    h.world.trigger(ResetTourEvent {});
    h.run_until_idle();

    assert_eq!(h.tour().current(), TourState::Step(0));
    assert_eq!(h.tour().resets_completed(), 1);
    let fresh = members_of(&mut h.world, "A");
    assert_eq!(fresh.len(), 2);
    for e in &old {
        assert!(!fresh.contains(e));
    }
    for e in fresh {
        let fader = h.world.get::<Fader>(e).unwrap();
        assert_eq!(fader.opacity(), 1.0);
        assert!(!fader.is_fading());
    }
}

#[test]
fn jump_to_current_step_keeps_its_content() {
    let mut h = two_step_harness();
    h.advance();
    h.advance();

    h.world
        .resource_mut::<Tour>()
        .request_jump(TourState::Step(1))
        .unwrap();
    h.run_until_idle();

    assert_eq!(h.tour().current(), TourState::Step(1));
    assert_eq!(h.count_members("A"), 0);
    assert_eq!(h.count_members("B"), 1);
}

#[test]
fn builtin_intro_still_advances_after_reset_onto_it() {
    let mut config = TourConfig::new();
    config.fade_duration = FADE;
    let loader = game::default_loader(&config);
    let mut h = Harness::with_loader(config, loader, CallLog::default());
    game::bootstrap(&mut h.world);
    h.run_until_idle();
    assert_eq!(h.tour().current(), TourState::Step(0));

    h.world.trigger(ResetTourEvent {});
    h.run_until_idle();
    assert_eq!(h.tour().resets_completed(), 1);

    let mut ticks = 0;
    while h.tour().current() != TourState::Step(1) {
        h.tick(DT);
        ticks += 1;
        assert!(ticks < 2_000, "intro never advanced after the reset");
    }
}

// =============================================================================
// Built-in scenario
// =============================================================================

#[test]
fn builtin_tour_runs_a_full_lap_unattended() {
    let mut config = TourConfig::new();
    config.fade_duration = FADE;
    let loader = game::default_loader(&config);
    let mut h = Harness::with_loader(config, loader, CallLog::default());
    game::bootstrap(&mut h.world);

    let mut ticks = 0;
    while h.tour().resets_completed() < 1 {
        h.tick(DT);
        ticks += 1;
        assert!(ticks < 5_000, "lap never completed");
    }

    let entered: Vec<TourState> = h.entered().into_iter().map(|(s, _)| s).collect();
    assert_eq!(
        entered,
        vec![
            TourState::Step(0),
            TourState::Step(1),
            TourState::Step(2),
            TourState::Step(0),
        ]
    );
    assert!(matches!(h.entered()[2].1, TransitionKind::Preserve(_)));
    assert!(h.world.resource::<FreeLookCamera>().return_to_origin);
}
