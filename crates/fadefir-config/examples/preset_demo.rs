//! Preset demo: factory presets, validation, and switching filters by name.
//!
//! Run with: cargo run -p fadefir-config --example preset_demo

use fadefir_config::{
    CoefficientSet, FilterBank, FilterPreset, factory_preset_names, get_factory_preset,
    is_factory_preset, validate_preset,
};
use fadefir_core::{FirEngine, MemoryPlan};

fn main() {
    // --- Factory presets ---
    println!("=== Factory Presets ===\n");

    for name in factory_preset_names() {
        if let Some(preset) = get_factory_preset(name) {
            println!(
                "  {:<12} {:<14} {:>2}-bit  {:>3} taps  {}",
                name,
                preset.name,
                preset.engine.data_width,
                preset.engine.max_num_taps,
                preset.filter_names().join(", ")
            );
        }
    }

    println!();
    for name in ["tone_switch", "Tone Switch", "my_filter"] {
        println!("is_factory_preset({name:?}) = {}", is_factory_preset(name));
    }

    // --- Validation ---
    println!("\n=== Validation ===\n");

    let broken = FilterPreset::new("Broken")
        .with_max_num_taps(4)
        .with_filter(CoefficientSet::q16("too_long", 15, &[1; 6]))
        .with_filter(CoefficientSet::q16("too_long", 40, &[1]));
    match validate_preset(&broken) {
        Ok(()) => println!("unexpectedly valid"),
        Err(e) => println!("{e}"),
    }

    // --- TOML ---
    println!("\n=== TOML ===\n");

    let Some(preset) = get_factory_preset("tone_switch") else {
        eprintln!("tone_switch preset missing");
        return;
    };
    match preset.to_toml() {
        Ok(toml) => println!("{toml}"),
        Err(e) => eprintln!("serialize: {e}"),
    }

    // --- Switching filters ---
    println!("=== Switching Filters ===\n");

    let bank = match FilterBank::from_preset(&preset) {
        Ok(bank) => bank,
        Err(e) => {
            eprintln!("bank: {e}");
            return;
        }
    };
    let params = bank.static_params();
    let mut words = vec![0_u64; MemoryPlan::new(&params).required_words()];
    let mut fir = match FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)) {
        Ok(fir) => fir,
        Err(e) => {
            eprintln!("init: {e}");
            return;
        }
    };
    if let Err(e) = fir.set_crossfade_params(bank.crossfade_params()) {
        eprintln!("crossfade: {e}");
        return;
    }

    // alternating full-scale samples: highest frequency the format holds
    let input: Vec<i16> = (0..params.frame_size)
        .map(|i| if i % 2 == 0 { 12000 } else { -12000 })
        .collect();
    let mut output = vec![0_i16; params.frame_size];

    println!("{:<6} {:<10} {:>10} {:>8}", "Frame", "Filter", "Remaining", "Peak");
    println!("{:-<6} {:-<10} {:->10} {:->8}", "", "", "", "");

    for frame in 0..8 {
        let name = if frame < 3 { "lowpass" } else { "highpass" };
        if frame == 0 || frame == 3 {
            let config = match bank.config(name) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{e}");
                    return;
                }
            };
            if let Err(e) = fir.set_configuration(config) {
                eprintln!("configuration: {e}");
                return;
            }
        }
        if let Err(e) = fir.process(&input, &mut output) {
            eprintln!("process: {e}");
            return;
        }
        let peak = output.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
        println!(
            "{:<6} {:<10} {:>10} {:>8}",
            frame,
            name,
            fir.transition_status().remaining_samples,
            peak
        );
    }
}
