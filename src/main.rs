use clap::Parser;
use gigatron_vga::types::Tick;
use gigatron_vga::vga::*;
use pixels::{Pixels, SurfaceTexture};
use std::error::Error;
use std::path::{Path, PathBuf};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

#[derive(Debug, Parser)]
#[command(about = "Decode a synthetic Gigatron VGA signal and show the result")]
struct Args {
    /// Image to send down the cable. Defaults to colour bars.
    image: Option<PathBuf>,

    /// Probability of a colour bit flipping on any given tick.
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Save a 160x120 thumbnail of the last frame here on exit.
    #[arg(long)]
    thumbnail: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();

    let args = Args::parse();
    let timing = TimingConfig::GIGATRON;
    let (width, height) = timing.visible_size();

    let encoder = match &args.image {
        Some(path) => VgaEncoder::from_image_buf(timing, &std::fs::read(path)?)?,
        None => VgaEncoder::test_pattern(timing)?,
    };
    let mut decoder = RasterDecoder::new(timing)?;

    // Create event loop.
    let event_loop = EventLoop::new();

    // Create window.
    let window = {
        let size = PhysicalSize::new(width as f64, height as f64);

        WindowBuilder::new()
            .with_title("Gigatron VGA")
            .with_inner_size(size)
            .with_min_inner_size(size)
            .build(&event_loop)?
    };

    // Create pixel buffer.
    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(width as u32, height as u32, surface_texture)?
    };

    // Show the decoder's black starting frame until the first vertical sync edge.
    pixels.get_frame_mut().copy_from_slice(decoder.committed_frame().as_bytes());
    pixels.render()?;

    let noise = args.noise.clamp(0.0, 1.0);
    let mut tick: Tick = 0;

    log::info!("Decoding {width}x{height}, {} ticks per frame", encoder.ticks_per_frame());

    event_loop.run(move |event, _, control_flow| match event {
        Event::RedrawRequested(_) => {
            for _ in 0..encoder.ticks_per_frame() {
                let mut sample = encoder.sample(tick);
                // Colour bits only. A noisy sync line would make any monitor lose lock.
                if noise > 0.0 {
                    for bit in 0..6 {
                        if rand::random::<f64>() < noise {
                            sample.0 ^= 1 << bit;
                        }
                    }
                }
                tick += 1;

                if let Some(commit) = decoder.advance(sample) {
                    log::trace!("Presenting frame {}", commit.number());
                    pixels.get_frame_mut().copy_from_slice(commit.frame().as_bytes());
                }
            }

            if let Err(err) = pixels.render() {
                log::error!("Failed to render pixel buffer to screen: {err}");
                *control_flow = ControlFlow::Exit;
            }
        }
        Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
            if let Some(path) = &args.thumbnail {
                save_thumbnail(decoder.committed_frame(), path);
            }
            *control_flow = ControlFlow::Exit;
        }
        Event::MainEventsCleared => {
            window.request_redraw();
        }
        _ => {}
    });
}

fn save_thumbnail(frame: &Framebuffer, path: &Path) {
    let result = ThumbnailSampler::new()
        .sample_framebuffer(frame)
        .map_err(Box::<dyn Error>::from)
        .and_then(|thumbnail| Ok(thumbnail.to_image().save(path)?));

    match result {
        Ok(()) => log::info!("Saved thumbnail to {}", path.display()),
        Err(err) => log::error!("Failed to save thumbnail to {}: {err}", path.display()),
    }
}
