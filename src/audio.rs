//! Thruster audio
//!
//! The engine hum is synthesized at startup; no sound files are shipped.

use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use bevy::audio::{AddAudioSource, AudioSinkPlayback, Decodable, Source, Volume};
use bevy::prelude::*;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::simulation::{Lander, SimulationSet};

const SAMPLE_RATE: u32 = 44_100;
const THRUSTER_FREQUENCY: f32 = 220.0; // Hz
const THRUSTER_BUFFER: f32 = 0.25; // seconds, a whole number of periods
const THRUSTER_AMPLITUDE: f32 = 0.3;

/// Mono 16-bit PCM buffer that Bevy can play as an audio source.
#[derive(Asset, TypePath, Debug, Clone)]
pub struct ToneBuffer {
    samples: Arc<[i16]>,
    sample_rate: u32,
}

impl ToneBuffer {
    pub fn sine(
        frequency: f32,
        duration: f32,
        sample_rate: u32,
        amplitude: f32,
    ) -> Result<Self, GameError> {
        if sample_rate == 0 || !(duration > 0.0) || !(frequency > 0.0) {
            return Err(GameError::Audio(format!(
                "cannot synthesize {frequency} Hz for {duration} s at {sample_rate} Hz"
            )));
        }
        if !(0.0..=1.0).contains(&amplitude) {
            return Err(GameError::Audio(format!("amplitude {amplitude} out of range")));
        }

        let sample_count = (sample_rate as f32 * duration) as usize;
        let samples = (0..sample_count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (i16::MAX as f32 * amplitude * (TAU * frequency * t).sin()) as i16
            })
            .collect();

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn thruster() -> Result<Self, GameError> {
        Self::sine(
            THRUSTER_FREQUENCY,
            THRUSTER_BUFFER,
            SAMPLE_RATE,
            THRUSTER_AMPLITUDE,
        )
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

pub struct ToneDecoder {
    samples: Arc<[i16]>,
    cursor: usize,
    sample_rate: u32,
}

impl Iterator for ToneDecoder {
    type Item = i16;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.samples.get(self.cursor).copied();
        self.cursor += 1;
        sample
    }
}

impl Source for ToneDecoder {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.samples.len() as f64 / self.sample_rate as f64,
        ))
    }
}

impl Decodable for ToneBuffer {
    type DecoderItem = i16;
    type Decoder = ToneDecoder;

    fn decoder(&self) -> Self::Decoder {
        ToneDecoder {
            samples: Arc::clone(&self.samples),
            cursor: 0,
            sample_rate: self.sample_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrusterCue {
    Start,
    Stop,
    Hold,
}

pub fn thruster_cue(engine_firing: bool, voice_playing: bool) -> ThrusterCue {
    match (engine_firing, voice_playing) {
        (true, false) => ThrusterCue::Start,
        (false, true) => ThrusterCue::Stop,
        _ => ThrusterCue::Hold,
    }
}

/// Sound state for the single looping engine voice. `tone` is `None` when
/// synthesis failed and the game runs silent.
#[derive(Resource, Default)]
pub struct ThrusterAudio {
    pub tone: Option<Handle<ToneBuffer>>,
    pub voice: Option<Entity>,
}

#[derive(Component)]
pub struct ThrusterVoice;

#[derive(Component)]
pub struct FadeOut {
    timer: Timer,
    start_volume: f32,
}

impl FadeOut {
    pub fn new(duration: Duration, start_volume: f32) -> Self {
        Self {
            timer: Timer::new(duration, TimerMode::Once),
            start_volume,
        }
    }

    pub fn volume(&self) -> f32 {
        self.start_volume * self.timer.fraction_remaining()
    }
}

pub struct ThrusterAudioPlugin;

impl Plugin for ThrusterAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_audio_source::<ToneBuffer>()
            .init_resource::<ThrusterAudio>()
            .add_systems(Startup, load_thruster_tone)
            .add_systems(
                Update,
                (thruster_audio_system.after(SimulationSet), fade_out_voices),
            );
    }
}

pub fn load_thruster_tone(
    mut tones: ResMut<Assets<ToneBuffer>>,
    mut audio: ResMut<ThrusterAudio>,
) {
    match ToneBuffer::thruster() {
        Ok(tone) => {
            info!(
                "Thruster tone ready ({} samples, {:?} loop)",
                tone.samples().len(),
                tone.duration()
            );
            audio.tone = Some(tones.add(tone));
        }
        Err(e) => {
            warn!("{e}; thruster sound disabled");
            audio.tone = None;
        }
    }
}

pub fn thruster_audio_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    lander: Res<Lander>,
    mut audio: ResMut<ThrusterAudio>,
) {
    let Some(tone) = audio.tone.clone() else {
        return;
    };

    match thruster_cue(lander.engine_firing(), audio.voice.is_some()) {
        ThrusterCue::Start => {
            let voice = commands
                .spawn((
                    AudioPlayer(tone),
                    PlaybackSettings::LOOP.with_volume(Volume::new(config.thruster_volume)),
                    ThrusterVoice,
                ))
                .id();
            audio.voice = Some(voice);
        }
        ThrusterCue::Stop => {
            if let Some(voice) = audio.voice.take() {
                commands.entity(voice).insert(FadeOut::new(
                    Duration::from_millis(config.thruster_fade_ms),
                    config.thruster_volume,
                ));
            }
        }
        ThrusterCue::Hold => {}
    }
}

pub fn fade_out_voices(
    mut commands: Commands,
    time: Res<Time>,
    mut voices: Query<(Entity, &mut FadeOut, Option<&AudioSink>), With<ThrusterVoice>>,
) {
    for (entity, mut fade, sink) in voices.iter_mut() {
        fade.timer.tick(time.delta());
        // No sink means no output device; the voice was never audible.
        if let Some(sink) = sink {
            sink.set_volume(fade.volume());
        }
        if fade.timer.finished() {
            commands.entity(entity).despawn();
        }
    }
}
