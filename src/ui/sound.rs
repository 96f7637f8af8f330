/// Sound engine: procedural retro sound effects via rodio.
///
/// Each effect is generated once at init as a mono f32 sample buffer and
/// played fire-and-forget through a detached Sink. Compile without the
/// "sound" feature to disable audio entirely (the stub does nothing).

#[cfg(feature = "sound")]
mod inner {
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = 2.0 * std::f32::consts::PI;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Vec<f32>,
        sfx_land: Vec<f32>,
        sfx_bump: Vec<f32>,
        sfx_fall: Vec<f32>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump: gen_jump(),
                sfx_land: gen_land(),
                sfx_bump: gen_bump(),
                sfx_fall: gen_fall(),
            })
        }

        fn play(&self, samples: &[f32]) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
                sink.detach(); // fire-and-forget
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_land(&self) { self.play(&self.sfx_land); }
        pub fn play_bump(&self) { self.play(&self.sfx_bump); }
        pub fn play_fall(&self) { self.play(&self.sfx_fall); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Jump: quick upward sine sweep, 260 Hz → 720 Hz
    fn gen_jump() -> Vec<f32> {
        let duration = 0.09;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 260.0 + t * 460.0;
                phase += freq * TAU / SAMPLE_RATE as f32;
                let env = 1.0 - t * t;
                phase.sin() * env * 0.28
            })
            .collect()
    }

    /// Landing: low thud, a decaying 100 Hz tone under a short noise burst
    fn gen_land() -> Vec<f32> {
        let duration = 0.1;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 0x2545_f491;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * 100.0 * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(2.0);
                (tone * 0.7 + noise * 0.3) * env * 0.35
            })
            .collect()
    }

    /// Wall/ceiling bump: a very short filtered click
    fn gen_bump() -> Vec<f32> {
        let duration = 0.035;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 777;
        let mut prev = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // One-pole low-pass to soften the click
                prev = prev * 0.6 + noise * 0.4;
                prev * (1.0 - t) * 0.3
            })
            .collect()
    }

    /// Fall-out respawn: long descending whistle, 650 Hz → 120 Hz
    fn gen_fall() -> Vec<f32> {
        let duration = 0.3;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 650.0 - t * 530.0;
                phase += freq * TAU / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(0.7);
                phase.sin() * env * 0.25
            })
            .collect()
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_jump(&self) {}
    pub fn play_land(&self) {}
    pub fn play_bump(&self) {}
    pub fn play_fall(&self) {}
}
