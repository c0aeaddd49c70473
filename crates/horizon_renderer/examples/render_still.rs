//! Headless progressive render.
//!
//! Steps the progressive renderer to completion from a fixed orbit, draws the
//! disk outline on top and saves the frame as PNG.

use horizon_renderer::{
    draw_disk_outline, Camera, HorizonConfig, ProgressiveRenderer, RenderResult,
};

fn main() -> RenderResult<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let mut config = HorizonConfig::default();
    config.render.width = 800;
    config.render.height = 600;
    config.render.rows_per_step = 40;
    config.validate()?;

    let camera = Camera::from_config(&config.camera, &config.scene)?.with_orbit(30.0, 0.6, 0.25);
    let mut renderer = ProgressiveRenderer::new(config.render.clone(), config.scene)?;

    println!(
        "Rendering {}x{} from {}",
        config.render.width,
        config.render.height,
        camera.label()
    );

    let start = std::time::Instant::now();
    let mut steps = 0;
    while renderer.is_active() {
        renderer.step_parallel(&camera, config.render.rows_per_step);
        steps += 1;
    }
    println!("Rendered in {:?} over {} steps", start.elapsed(), steps);

    let mut image = renderer.frame().clone();
    draw_disk_outline(&mut image, &camera, renderer.scene());

    let filename = "horizon.png";
    image.save_png(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}
