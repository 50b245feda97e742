use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use lockin_core::audio::{AmbientMixer, AmbientSound, SAMPLE_RATE};
use lockin_core::Config;

#[derive(Subcommand)]
pub enum SoundAction {
    /// Render the ambient mix as raw little-endian f32 mono PCM at 44.1 kHz
    Render {
        /// Length in seconds
        #[arg(long, default_value = "10")]
        seconds: u32,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Volume 0..1 (defaults to sound.volume)
        #[arg(long)]
        volume: Option<f32>,
    },
}

pub fn run(action: SoundAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SoundAction::Render {
            seconds,
            output,
            volume,
        } => {
            let config = Config::load()?;
            let mut mixer = AmbientMixer::new(
                SAMPLE_RATE,
                volume.unwrap_or(config.sound.volume),
                Duration::from_millis(config.sound.smoothing_ms),
            )?;
            mixer.enable();

            let mut writer = BufWriter::new(File::create(&output)?);
            let mut buf = vec![0.0f32; SAMPLE_RATE as usize];
            for _ in 0..seconds {
                mixer.render(&mut buf);
                for sample in &buf {
                    writer.write_all(&sample.to_le_bytes())?;
                }
            }
            writer.flush()?;
            println!("wrote {seconds}s of audio to {}", output.display());
        }
    }
    Ok(())
}
