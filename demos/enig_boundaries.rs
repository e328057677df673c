use microstrip_zs::prelude::*;

fn main() -> Result<(), ModelError> {
    tracing_subscriber::fmt::init();

    let freqs = logspace_hz(1.0e9, 150.0e9, 12);
    let nickel = LandauLifshitz::nickel().sample(&freqs);

    // Bare copper trace top vs. the same trace with ENIG plating.
    let copper = LayerStack::from_specs(
        HalfSpace::air(),
        &[LayerSpec::new().mur(0.999_991).rrms(50.0e-9)],
    )?;
    let enig = LayerStack::from_specs(
        HalfSpace::air(),
        &[
            LayerSpec::new().sigma(41.0e6).mur(0.999_96).rrms(50.0e-9),
            LayerSpec::new().sigma(14.5e6).mur(nickel).boundary_loc(0.05e-6),
            LayerSpec::new().mur(0.999_991).boundary_loc(5.25e-6),
        ],
    )?;

    let zs_cu = copper.surface_impedance(&freqs)?;
    let zs_enig = enig.surface_impedance(&freqs)?;
    let eta0 = HalfSpace::air().intrinsic_impedance(0);

    println!("freq(GHz), Rs_cu(ohm), Xs_cu(ohm), Rs_enig(ohm), Xs_enig(ohm), |1+G|_enig");
    for ((f, cu), en) in freqs.iter().zip(&zs_cu).zip(&zs_enig) {
        let leak = (1.0 + reflection_coefficient(*en, eta0)).norm();
        println!(
            "{:.3}, {:.6e}, {:.6e}, {:.6e}, {:.6e}, {:.3e}",
            f * 1e-9,
            cu.re,
            cu.im,
            en.re,
            en.im,
            leak
        );
    }
    Ok(())
}
