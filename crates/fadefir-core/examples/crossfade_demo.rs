//! Crossfade demo: plan a block, swap filters mid-stream, watch the ramp.
//!
//! Run with: cargo run -p fadefir-core --example crossfade_demo

use fadefir_core::{
    CrossfadeParams, DataWidth, FilterConfig, FirCounters, FirEngine, MemoryPlan, StaticParams,
};

const SAMPLE_RATE: u32 = 48000;
const FRAME: usize = 48;

fn main() {
    let params = StaticParams::new(DataWidth::Bits16, SAMPLE_RATE, 8, FRAME);
    let plan = MemoryPlan::new(&params);

    println!("=== Memory plan ===\n");
    println!("{:<20} {:>8} {:>8}", "Region", "Offset", "Bytes");
    println!("{:-<20} {:->8} {:->8}", "", "", "");
    for (name, region) in [
        ("active history", plan.active_history),
        ("active staging", plan.active_staging),
        ("outgoing history", plan.outgoing_history),
        ("outgoing staging", plan.outgoing_staging),
        ("outgoing output", plan.outgoing_output),
    ] {
        println!("{:<20} {:>8} {:>8}", name, region.offset, region.bytes);
    }
    println!("block: {} bytes", plan.required_bytes());
    println!("handle: {} bytes", MemoryPlan::handle_bytes::<i16>());

    // 8-tap moving average, then a 2-tap differentiator (both Q15)
    let average = [4096_i16; 8];
    let difference = [16384_i16, -16384];

    let counters = FirCounters::new();
    let mut words = vec![0_u64; plan.required_words()];
    let mut fir = match FirEngine::<i16>::init(params, bytemuck::cast_slice_mut(&mut words)) {
        Ok(fir) => fir,
        Err(e) => {
            eprintln!("init failed: {e}");
            return;
        }
    };
    fir.attach_counters(&counters);

    if let Err(e) = fir.set_crossfade_params(CrossfadeParams::enabled(2)) {
        eprintln!("crossfade: {e}");
        return;
    }
    if let Err(e) = fir.set_configuration(FilterConfig::new(15, &average[..])) {
        eprintln!("configuration: {e}");
        return;
    }

    // 1 kHz square wave at half scale
    let input: Vec<i16> = (0..FRAME)
        .map(|i| if (i / 24) % 2 == 0 { 16000 } else { -16000 })
        .collect();
    let mut output = [0_i16; FRAME];

    println!("\n=== Processing ===\n");
    println!("{:<6} {:>12} {:>10} {:>8} {:>8}", "Frame", "Gain (Q30)", "Remaining", "Last", "Peak");
    println!("{:-<6} {:->12} {:->10} {:->8} {:->8}", "", "", "", "", "");

    for frame in 0..6 {
        if frame == 2 {
            // shorter filter: crossfades over 2 ms
            if let Err(e) = fir.set_configuration(FilterConfig::new(15, &difference[..])) {
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
            "{:<6} {:>12} {:>10} {:>8} {:>8}",
            frame,
            fir.panner().current_gain(),
            fir.transition_status().remaining_samples,
            output[FRAME - 1],
            peak
        );
    }

    let snap = counters.snapshot();
    println!("\n=== Counters ===\n");
    println!("frames:                {}", snap.frames);
    println!("transitions started:   {}", snap.transitions_started);
    println!("transitions completed: {}", snap.transitions_completed);
    println!("synchronous:           {}", snap.synchronous_replacements);
}
