// Engine Scheduler - Owns the arrangement and turns transport ticks into music
// Bar ticks regenerate material before any step of that bar fires; step ticks trigger and broadcast

use rand::SeedableRng;
use rand_pcg::Pcg32;
use uuid::Uuid;

use super::humanize::{hihat_variation, humanize};
use super::status::{EngineStatus, NextSection, PlaybackState};
use super::synth::{SynthBackend, Trigger};
use super::transport::{note_length, ScheduleId, Tick, Transport, TransportState};
use super::watchdog::{Watchdog, WatchdogStatus};
use crate::arranger::{get_section, upcoming_section, ArrangementState, BarContext};
use crate::automation::{kick_pump, section_entry_ramps, stab_filter, RiserCommand, TensionAutomation};
use crate::events::{EventBus, MusicEvent};
use crate::generator::bass::{doubles_octave, sub_sequence, SUB_DOUBLE_DELAY, SUB_DOUBLE_VELOCITY};
use crate::generator::melody::{is_accent, regenerates_on, MelodicGenerator};
use crate::generator::{BarPatterns, PatternGenerator};
use crate::patterns::{Genre, Instrument, NoteSequence, STEPS_PER_BAR};
use crate::settings::{get_preset, ConfigError, EngineConfig, HumanizeConfig, MusicPreset, MAX_BPM, MIN_BPM};

/// Delay between chord tones of a stab
pub const STAB_STRUM: f64 = 0.015;

const BAR_STEPS: u64 = STEPS_PER_BAR as u64;

/// One playable engine instance.
///
/// All mutation happens on the caller's thread: transport ticks are pulled
/// with `pump` and setters are plain method calls.
pub struct Engine<T: Transport, S: SynthBackend> {
    transport: T,
    synth: S,
    bus: EventBus,

    arrangement: ArrangementState,
    rng: Pcg32,
    genre: Genre,
    patterns: PatternGenerator,
    melody: MelodicGenerator,
    automation: TensionAutomation,
    humanize: HumanizeConfig,
    watchdog: Watchdog,

    playback: PlaybackState,
    session: Option<Uuid>,

    /// Bar most recently resolved by a bar tick
    current: Option<BarContext>,
    bar_patterns: BarPatterns,
    acid: NoteSequence,
    sub: NoteSequence,

    bar_schedule: Option<ScheduleId>,
    step_schedule: Option<ScheduleId>,
    /// First step not yet dispatched
    next_step: u64,
}

impl<T: Transport, S: SynthBackend> Engine<T, S> {
    pub fn new(transport: T, synth: S, config: &EngineConfig) -> Self {
        let config = config.clamped();
        let rng = match config.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_entropy(),
        };

        let mut engine = Engine {
            transport,
            synth,
            bus: EventBus::new(),
            arrangement: ArrangementState::new(),
            rng,
            genre: config.genre,
            patterns: PatternGenerator::new(config.genre),
            melody: MelodicGenerator::default(),
            automation: TensionAutomation::new(),
            humanize: config.humanize.clone(),
            watchdog: Watchdog::new(config.watchdog),
            playback: PlaybackState::Stopped,
            session: None,
            current: None,
            bar_patterns: BarPatterns::default(),
            acid: NoteSequence::rest(),
            sub: NoteSequence::rest(),
            bar_schedule: None,
            step_schedule: None,
            next_step: 0,
        };

        engine.arrangement.set_energy(config.energy);
        engine.arrangement.set_tension(config.tension);
        for (instrument, muted) in &config.mutes {
            engine.arrangement.set_muted(*instrument, *muted);
        }
        engine.transport.set_bpm(config.effective_bpm());
        engine.synth.set_stab_patch(config.genre.stab_patch());
        engine.synth.set_kick_tuning(config.genre.kick_tuning());
        engine
    }

    // ---- Lifecycle ----

    /// Start from bar 0. Resumes instead when paused; no-op while playing.
    pub fn start(&mut self) {
        match self.playback {
            PlaybackState::Playing => return,
            PlaybackState::Paused => return self.resume(),
            PlaybackState::Stopped => {}
        }

        self.arrangement.reset();
        self.current = None;
        self.bar_patterns = BarPatterns::default();
        self.acid = NoteSequence::rest();
        self.sub = NoteSequence::rest();

        self.clear_schedules();
        self.transport.stop();
        self.transport.start();
        self.schedule_from(0);

        let now = self.transport.now();
        self.watchdog.reset(now);
        let session = Uuid::new_v4();
        self.session = Some(session);
        self.playback = PlaybackState::Playing;

        log::info!(
            "Playback started: session {} ({}, {:.0} BPM)",
            session,
            self.genre,
            self.transport.bpm()
        );
    }

    /// Tear down every schedule and rewind. The next start is a full reset.
    pub fn stop(&mut self) {
        if self.playback == PlaybackState::Stopped {
            return;
        }

        self.clear_schedules();
        self.transport.stop();

        let now = self.transport.now();
        if self.automation.riser_active() {
            self.synth.riser(RiserCommand::Release, now);
        }
        self.automation.reset();
        self.synth.silence();

        self.arrangement.reset();
        self.current = None;
        self.bar_patterns = BarPatterns::default();
        self.acid = NoteSequence::rest();
        self.sub = NoteSequence::rest();
        self.next_step = 0;
        self.playback = PlaybackState::Stopped;

        if let Some(session) = self.session.take() {
            log::info!("Playback stopped: session {}", session);
        }
    }

    /// Hold position and arrangement state
    pub fn pause(&mut self) {
        if self.playback != PlaybackState::Playing {
            return;
        }
        self.transport.pause();
        self.playback = PlaybackState::Paused;
        log::info!("Playback paused at bar {}", self.arrangement.current_bar);
    }

    pub fn resume(&mut self) {
        if self.playback != PlaybackState::Paused {
            return;
        }
        self.transport.start();
        // Time spent paused is not a stall
        self.watchdog.note_callback(self.transport.now());
        self.playback = PlaybackState::Playing;
        log::info!("Playback resumed at bar {}", self.arrangement.current_bar);
    }

    // ---- Setter surface ----

    /// Clamp to the supported tempo range. Non-finite input is ignored.
    pub fn set_bpm(&mut self, bpm: f64) -> f64 {
        if !bpm.is_finite() {
            return self.transport.bpm();
        }
        let bpm = bpm.clamp(MIN_BPM, MAX_BPM);
        self.transport.set_bpm(bpm);
        self.bus.emit(MusicEvent::TempoChange { bpm });
        bpm
    }

    pub fn set_energy(&mut self, level: f64) -> f64 {
        let stored = self.arrangement.set_energy(level);
        if level.is_finite() {
            self.bus.emit(MusicEvent::EnergyChange { level: stored });
        }
        stored
    }

    /// Tension moves are audible immediately while playing
    pub fn set_tension(&mut self, level: f64) -> f64 {
        let stored = self.arrangement.set_tension(level);
        if level.is_finite() {
            self.bus.emit(MusicEvent::TensionChange { level: stored });
            if self.playback == PlaybackState::Playing {
                self.apply_tension(self.transport.now());
            }
        }
        stored
    }

    /// Flip a track's mute by name. Unknown names are ignored (None).
    pub fn toggle_track(&mut self, name: &str) -> Option<bool> {
        let Ok(instrument) = name.parse::<Instrument>() else {
            log::debug!("Ignoring mute toggle for unknown track {:?}", name);
            return None;
        };

        let muted = self.arrangement.toggle_mute(instrument);
        let track = instrument.track_name().to_string();
        self.bus.emit(if muted {
            MusicEvent::TrackMute { track }
        } else {
            MusicEvent::TrackUnmute { track }
        });
        Some(muted)
    }

    /// Unknown names read as unmuted
    pub fn is_track_muted(&self, name: &str) -> bool {
        name.parse::<Instrument>()
            .map(|i| self.arrangement.is_muted(i))
            .unwrap_or(false)
    }

    /// Switch pattern pools, tempo, stab patch, and kick tuning
    pub fn set_genre(&mut self, genre: Genre) {
        let previous = self.genre;
        self.genre = genre;
        self.patterns = PatternGenerator::new(genre);
        self.synth.set_stab_patch(genre.stab_patch());
        self.synth.set_kick_tuning(genre.kick_tuning());
        self.set_bpm(genre.config().bpm_default);

        if let Some(ctx) = self.current {
            self.bar_patterns = self.patterns.generate(
                ctx.section,
                ctx.bar,
                self.arrangement.energy(),
                self.arrangement.tension(),
                &mut self.rng,
            );
            self.sub = sub_sequence(&ctx.chord, genre);
        }

        if previous != genre {
            log::info!("Genre switched: {} -> {}", previous, genre);
        }
    }

    /// Apply a named energy/tension preset
    pub fn apply_preset(&mut self, name: &str) -> Result<MusicPreset, ConfigError> {
        let preset = get_preset(name).ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
        self.set_energy(preset.energy);
        self.set_tension(preset.tension);
        log::info!("Preset {}: {}", preset.name, preset.description);
        Ok(preset)
    }

    // ---- Clock ----

    /// Dispatch every due tick in order. Returns the number dispatched.
    pub fn pump(&mut self) -> usize {
        if self.playback != PlaybackState::Playing {
            return 0;
        }

        let ticks = self.transport.drain_due();
        for tick in &ticks {
            if Some(tick.id) == self.bar_schedule {
                self.on_bar(tick);
            } else if Some(tick.id) == self.step_schedule {
                self.on_step(tick);
            }
        }
        ticks.len()
    }

    /// Fixed-interval watchdog entry point. Recovers a stalled schedule at
    /// most once per cooldown; returns true when it did.
    pub fn poll_watchdog(&mut self, now: f64) -> bool {
        if !self.watchdog.poll_due(now) {
            return false;
        }
        if self.playback != PlaybackState::Playing || self.transport.state() != TransportState::Started {
            return false;
        }
        if !self.watchdog.should_recover(now) {
            return false;
        }

        let stalled_for = self.watchdog.seconds_since_last_callback(now);
        let recovered = self.recover_loops(now);
        if recovered {
            log::warn!("Music watchdog recovered stalled loops ({:.1}s without a callback)", stalled_for);
        }
        recovered
    }

    pub fn watchdog_status(&self, now: f64) -> WatchdogStatus {
        self.watchdog.status(now)
    }

    /// Rebuild both schedules from the current transport position.
    /// Returns false when not playing.
    pub fn recover_loops(&mut self, now: f64) -> bool {
        if self.playback != PlaybackState::Playing {
            return false;
        }

        self.clear_schedules();
        let position = self.transport.position().max(0.0).ceil() as u64;
        self.schedule_from(position.max(self.next_step));
        self.watchdog.record_recovery(now);
        true
    }

    // ---- Queries ----

    pub fn status(&self) -> EngineStatus {
        let (bar, section, chord) = match &self.current {
            Some(ctx) => (ctx.bar, ctx.section, ctx.chord.display_name()),
            None => {
                let bar = self.arrangement.current_bar;
                (bar, get_section(bar), self.arrangement.current_chord().display_name())
            }
        };
        let (next, bars_until) = upcoming_section(bar);

        EngineStatus {
            state: self.playback,
            session: self.session,
            bar,
            section,
            chord,
            next_section: NextSection { section: next, bars_until },
            energy: self.arrangement.energy(),
            tension: self.arrangement.tension(),
            bpm: self.transport.bpm(),
            genre: self.genre,
            mutes: self.arrangement.mute_states().clone(),
            watchdog_recoveries: self.watchdog.status(self.transport.now()).recoveries,
        }
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn arrangement(&self) -> &ArrangementState {
        &self.arrangement
    }

    pub fn current_bar(&self) -> Option<&BarContext> {
        self.current.as_ref()
    }

    pub fn bar_patterns(&self) -> &BarPatterns {
        &self.bar_patterns
    }

    pub fn acid_sequence(&self) -> &NoteSequence {
        &self.acid
    }

    pub fn sub_sequence(&self) -> &NoteSequence {
        &self.sub
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn synth(&self) -> &S {
        &self.synth
    }

    pub fn synth_mut(&mut self) -> &mut S {
        &mut self.synth
    }

    // ---- Callbacks ----

    fn on_bar(&mut self, tick: &Tick) {
        let time = tick.time;
        let ctx = self.arrangement.enter_bar(&mut self.rng);

        if let Some((previous, section)) = ctx.section_change {
            log::info!("Bar {}: entering {}", ctx.bar, section);
            self.bus.emit(MusicEvent::Section { section });
            for change in section_entry_ramps(section, previous, time) {
                self.synth.set_param(change);
            }
        }
        self.bus.emit(MusicEvent::Bar { bar: ctx.bar });

        // Melody first so stabs can voice around it
        if regenerates_on(ctx.bar) {
            self.acid = self.melody.generate(&ctx.chord, ctx.section, &self.acid, &mut self.rng);
        }
        self.bar_patterns = self.patterns.generate(
            ctx.section,
            ctx.bar,
            self.arrangement.energy(),
            self.arrangement.tension(),
            &mut self.rng,
        );
        self.sub = sub_sequence(&ctx.chord, self.genre);

        log::debug!(
            "Bar {}: {} {:?} chord {} ({}){}",
            ctx.bar,
            ctx.section,
            ctx.progression,
            ctx.chord_index,
            ctx.chord.display_name(),
            if self.bar_patterns.is_fill { " fill" } else { "" }
        );

        self.apply_tension(time);
        self.current = Some(ctx);
        self.arrangement.advance();
    }

    fn on_step(&mut self, tick: &Tick) {
        self.next_step = tick.step + 1;
        self.watchdog.note_callback(self.transport.now());

        let Some(ctx) = self.current else {
            return;
        };
        let step = (tick.step % BAR_STEPS) as usize;
        let bpm = self.transport.bpm();

        if self.bar_patterns.kick.is_active(step) {
            if let Some(t) = self.humanized(Instrument::Kick, tick.time) {
                self.synth.trigger(Instrument::Kick, Trigger::drum(t, note_length(bpm, 8)));
                for change in kick_pump(t) {
                    self.synth.set_param(change);
                }
                self.bus.emit(MusicEvent::Kick { time: t });
            }
        }

        if self.bar_patterns.snare.is_active(step) {
            if let Some(t) = self.humanized(Instrument::Snare, tick.time) {
                self.synth.trigger(Instrument::Snare, Trigger::drum(t, note_length(bpm, 8)));
                self.bus.emit(MusicEvent::Snare { time: t });
            }
        }

        if self.bar_patterns.hihat.is_active(step) {
            if let Some(t) = self.humanized(Instrument::Hihat, tick.time) {
                let (velocity, gate) = hihat_variation(bpm, &mut self.rng);
                self.synth.trigger(Instrument::Hihat, Trigger::drum(t, gate).with_velocity(velocity));
                self.bus.emit(MusicEvent::Hihat { time: t });
            }
        }

        if let Some(note) = self.acid.note_at(step) {
            if let Some(t) = self.humanized(Instrument::Acid, tick.time) {
                let accent = is_accent(step, self.arrangement.tension(), &mut self.rng);
                self.synth.trigger(
                    Instrument::Acid,
                    Trigger::note(note, t, note_length(bpm, 16)).with_accent(accent),
                );
                self.bus.emit(MusicEvent::Acid { time: t, note });
            }
        }

        if self.bar_patterns.stab.is_active(step) {
            if let Some(t) = self.humanized(Instrument::Stab, tick.time) {
                self.synth.set_param(stab_filter(ctx.section, t));
                // Keep out of the acid's way when it is playing high
                let drop = self.acid.note_at(step).map_or(false, |n| n.octave == 3);
                for (i, tone) in ctx.chord.chord.iter().enumerate() {
                    let tone = if drop { tone.transpose_octaves(-1) } else { *tone };
                    let at = t + i as f64 * STAB_STRUM;
                    self.synth.trigger(Instrument::Stab, Trigger::note(tone, at, note_length(bpm, 4)));
                }
                self.bus.emit(MusicEvent::Stab { time: t });
            }
        }

        if let Some(note) = self.sub.note_at(step) {
            if let Some(t) = self.humanized(Instrument::Sub, tick.time) {
                let gate = note_length(bpm, 2);
                self.synth.trigger(Instrument::Sub, Trigger::note(note, t, gate));
                if doubles_octave(ctx.section) {
                    self.synth.trigger(
                        Instrument::Sub,
                        Trigger::note(note.transpose_octaves(1), t + SUB_DOUBLE_DELAY, gate)
                            .with_velocity(SUB_DOUBLE_VELOCITY),
                    );
                }
                self.bus.emit(MusicEvent::Sub { time: t, note });
            }
        }
    }

    // ---- Internals ----

    /// Humanized trigger time, or None when the track is muted
    fn humanized(&mut self, instrument: Instrument, time: f64) -> Option<f64> {
        if self.arrangement.is_muted(instrument) {
            return None;
        }
        Some(humanize(time, self.humanize.amount(instrument), &mut self.rng))
    }

    fn apply_tension(&mut self, time: f64) {
        let frame = self.automation.apply(self.arrangement.tension(), time);
        for change in frame.changes {
            self.synth.set_param(change);
        }
        if let Some(command) = frame.riser {
            log::debug!("Riser {:?} at tension {:.0}", command, self.arrangement.tension());
            self.synth.riser(command, time);
        }
    }

    /// Register the bar and step schedules, steps from `step` and bars
    /// from the first bar boundary at or after it
    fn schedule_from(&mut self, step: u64) {
        let bar_start = step.div_ceil(BAR_STEPS) * BAR_STEPS;
        self.bar_schedule = Some(self.transport.schedule_repeat(BAR_STEPS, bar_start));
        self.step_schedule = Some(self.transport.schedule_repeat(1, step));
        self.next_step = step;
    }

    fn clear_schedules(&mut self) {
        if let Some(id) = self.bar_schedule.take() {
            self.transport.clear(id);
        }
        if let Some(id) = self.step_schedule.take() {
            self.transport.clear(id);
        }
    }
}
