//! Resonance - turns an audio file into a 3D spectrogram terrain
//!
//! Time runs along X, frequency along Z, and energy lifts the surface.

use std::process::ExitCode;

use clap::Parser;

use resonance::cli::Args;
use resonance::Generator;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    println!("Resonance - spectrogram terrain generator");

    let mut generator = Generator::new();
    if let Err(e) = generator.configure(args.generator_config()) {
        eprintln!("ERROR: {}", e);
        return ExitCode::FAILURE;
    }

    let source = args.input.to_string_lossy();
    if let Err(e) = generator.generate(&source) {
        eprintln!("ERROR: {}", e);
        return ExitCode::FAILURE;
    }

    let snapshot = generator.snapshot();
    let extent = snapshot.extent();
    println!("\nGenerated '{}'", source);
    println!(
        "  Grid:    {} time steps x {} bins ({:.2} Hz per bin)",
        snapshot.size.width, snapshot.size.depth, snapshot.layout.bin_width_hz
    );
    println!("  Extent:  {:.1} x {:.1} world units", extent.x, extent.y);
    println!("  Height:  {:.3}", snapshot.height);
    println!(
        "  Terrain: {} vertices, {} triangles",
        snapshot.terrain.vertices.len(),
        snapshot.terrain.triangle_count()
    );
    println!(
        "  Base:    {} vertices, {} triangles",
        snapshot.base.vertices.len(),
        snapshot.base.triangle_count()
    );

    ExitCode::SUCCESS
}
