//! Real-time playback using cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{PlaybackEngine, RenderGraph};
use crate::error::RenderError;
use crate::graph::GraphDescription;

/// Real-time graph player
pub struct Player {
    stream: Option<Stream>,
    running: Arc<AtomicBool>,
}

impl Player {
    /// Create a new player
    pub fn new() -> Self {
        Self {
            stream: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Compile the description for the default output device and start
    /// streaming it
    pub fn start(&mut self, description: &GraphDescription) -> Result<(), RenderError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(RenderError::NoOutputDevice)?;

        let config = device.default_output_config().map_err(backend)?;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        let graph = RenderGraph::compile(description, stream_config.sample_rate.0)?;
        let shared = Arc::new(Mutex::new(graph));

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();

        let stream = match sample_format {
            SampleFormat::F32 => {
                self.build_stream::<f32>(&device, &stream_config, shared, running)?
            }
            SampleFormat::I16 => {
                self.build_stream::<i16>(&device, &stream_config, shared, running)?
            }
            SampleFormat::U16 => {
                self.build_stream::<u16>(&device, &stream_config, shared, running)?
            }
            _ => return Err(RenderError::UnsupportedFormat),
        };

        stream.play().map_err(backend)?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.stream = None;
    }

    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
        &self,
        device: &Device,
        config: &StreamConfig,
        graph: Arc<Mutex<RenderGraph>>,
        running: Arc<AtomicBool>,
    ) -> Result<Stream, RenderError> {
        let channels = config.channels as usize;

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::SeqCst) {
                        // Fill with silence when stopped
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                        return;
                    }

                    if let Ok(mut graph) = graph.try_lock() {
                        for frame in data.chunks_mut(channels) {
                            let [l, r] = graph.process();
                            write_frame(frame, l as f32, r as f32);
                        }
                    } else {
                        // Mutex locked, fill with silence
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                    }
                },
                |err| {
                    eprintln!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(backend)?;

        Ok(stream)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackEngine for Player {
    fn play(&mut self, description: &GraphDescription) -> Result<(), RenderError> {
        self.start(description)
    }
}

fn write_frame<T: cpal::Sample + cpal::FromSample<f32>>(frame: &mut [T], l: f32, r: f32) {
    match frame.len() {
        0 => {}
        1 => frame[0] = T::from_sample(0.5 * (l + r)),
        _ => {
            frame[0] = T::from_sample(l);
            frame[1] = T::from_sample(r);
            for sample in &mut frame[2..] {
                *sample = T::from_sample(0.0f32);
            }
        }
    }
}

fn backend(err: impl std::fmt::Display) -> RenderError {
    RenderError::Backend(err.to_string())
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// Sample rate of the default output device
pub fn default_output_sample_rate() -> Option<u32> {
    let host = cpal::default_host();
    let device = host.default_output_device()?;
    let config = device.default_output_config().ok()?;
    Some(config.sample_rate().0)
}

/// List all available output devices
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
