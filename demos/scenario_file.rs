use std::env;

use microstrip_zs::prelude::*;

fn main() -> Result<(), MicrostripError> {
    tracing_subscriber::fmt::init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/enig.json").to_owned());
    let model = ScenarioConfig::from_path(&path)?.to_model()?;
    let request = model.prepare()?;

    println!(
        "{} points, solution frequency {:.3} GHz, port accuracy {}",
        request.frequencies.len(),
        request.solution_frequency * 1e-9,
        request.settings.port_accuracy
    );
    for face in &request.pec_faces {
        println!("{face}: perfect conductor");
    }
    for boundary in &request.boundaries {
        let last = boundary.zs.len() - 1;
        println!(
            "{}: resistance={} reactance={} Zs(fmax)={:.4}",
            boundary.face,
            boundary.resistance.expression(),
            boundary.reactance.expression(),
            boundary.zs[last]
        );
    }
    for dataset in &request.substrate {
        println!("substrate {} -> {}", dataset.name, dataset.expression());
    }
    Ok(())
}
