#![allow(clippy::new_without_default)]

mod assets;
mod config;
mod meshes;
mod profiling;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::video::{GLProfile, SwapInterval, Window};

use assets::Assets;
use caustic_gl::{self as cgl, Object};
use caustic_math::*;
use config::DemoConfig;
use prelude_plus::*;
use profiling::FrameTimeSampler;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;
const CAMERA_POS: Vec3f = vec3(0.0, 1.5, 3.5);
const ROTATION_SPEED: f32 = 1.0; // radians per second
const DIFFUSE_UNIFORM: &str = "diffuse";
const TINT_UNIFORM: &str = "tint";

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  if let Err(e) = try_main() {
    error!("{:?}", e);
    std::process::exit(1);
  }
}

fn try_main() -> AnyResult<()> {
  info!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

  let assets = Assets::init()?;
  let config = DemoConfig::load(&assets)?;
  debug!("{:#?}", config);

  let sdl_context = sdl2::init().map_err(AnyError::msg)?;
  let video_subsystem = sdl_context.video().map_err(AnyError::msg)?;

  let gl_attr = video_subsystem.gl_attr();
  gl_attr.set_context_profile(GLProfile::Compatibility);
  match config.context.api_version {
    Some(cgl::GlApiVersion::Gl30) => gl_attr.set_context_version(3, 0),
    Some(cgl::GlApiVersion::Gl20) => gl_attr.set_context_version(2, 1),
    None => {}
  }
  gl_attr.set_depth_size(24);
  if config.context.debug_output {
    gl_attr.set_context_flags().debug().set();
  }

  let window_title = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));
  let window = video_subsystem
    .window(window_title, config.window_size.x, config.window_size.y)
    .resizable()
    .opengl()
    .allow_highdpi()
    .build()
    .context("Failed to create the window")?;

  let _sdl_gl_ctx = window.gl_create_context().map_err(AnyError::msg)?;
  let swap_interval = if config.vsync { SwapInterval::VSync } else { SwapInterval::Immediate };
  if let Err(e) = video_subsystem.gl_set_swap_interval(swap_interval) {
    warn!("Failed to set the swap interval: {}", e);
  }

  let ctx = Rc::new(cgl::Context::load_with(&config.context, |name| {
    video_subsystem.gl_get_proc_address(name) as *const c_void
  })?);

  let mut event_pump = sdl_context.event_pump().map_err(AnyError::msg)?;

  let mut demo = Demo::new(&assets, &config, Rc::clone(&ctx))?;
  demo.reset_viewport(&window);

  let mut frame_times = FrameTimeSampler::new(config.frame_time_window);
  let log_interval = config.frame_time_log_interval();
  let mut last_report = Instant::now();
  let mut last_frame = Instant::now();

  'running: loop {
    frame_times.begin_frame();

    for event in event_pump.poll_iter() {
      match event {
        Event::Quit { .. } | Event::KeyDown { scancode: Some(Scancode::Escape), .. } => {
          break 'running;
        }

        Event::Window { win_event: WindowEvent::SizeChanged(..), .. } => {
          demo.reset_viewport(&window);
        }

        Event::KeyDown { scancode: Some(scancode), repeat, .. } => {
          demo.on_key_down(scancode, repeat)?;
        }

        _ => {}
      }
    }

    let now = Instant::now();
    demo.update(now - last_frame);
    last_frame = now;

    demo.renderer.render()?;
    window.gl_swap_window();

    frame_times.end_frame();
    if let Some(interval) = log_interval {
      if last_report.elapsed() >= interval {
        info!(
          "Frame time over the last {} frame(s): {:.2} ms average, {:.2} ms max, {:.0} FPS",
          frame_times.samples().len(),
          frame_times.average().as_secs_f64() * 1000.0,
          frame_times.max().as_secs_f64() * 1000.0,
          frame_times.fps(),
        );
        last_report = Instant::now();
      }
    }
  }

  Ok(())
}

struct Demo {
  renderer: cgl::Renderer,
  models: Vec<cgl::ModelHandle>,
  meshes: [cgl::VertexData; 2],
  current_mesh: usize,
  wireframe: bool,
  fov: f32,
}

impl Demo {
  fn new(assets: &Assets, config: &DemoConfig, ctx: cgl::SharedContext) -> AnyResult<Self> {
    let meshes = [meshes::cube(), meshes::pyramid()];

    let shader_version = match ctx.api_version() {
      cgl::GlApiVersion::Gl20 => "120",
      cgl::GlApiVersion::Gl30 => "130",
    };
    let vs = assets.load_shader(
      &format!("shaders/textured.{}.vert.glsl", shader_version),
      cgl::ShaderType::Vertex,
      Rc::clone(&ctx),
    )?;
    let fs = assets.load_shader(
      &format!("shaders/textured.{}.frag.glsl", shader_version),
      cgl::ShaderType::Fragment,
      Rc::clone(&ctx),
    )?;
    let program = cgl::Program::link(Rc::clone(&ctx), &[&vs, &fs], &meshes[0].attribute_bindings())
      .context("Failed to link the textured program")?;
    program.set_debug_label(b"textured");

    let texture = match &config.texture_path {
      Some(path) => assets.load_texture(path, config.texture, Rc::clone(&ctx))?,
      None => {
        let image = assets::checkerboard(256, 8, Colorf::WHITE, colorn(0.35, 1.0));
        assets::create_texture(Rc::clone(&ctx), config.texture, &image)?
      }
    };

    let material = Rc::new(cgl::Material::new(Rc::new(program)));
    material.add_texture(Rc::new(texture))?;
    material.uniforms_mut().set(DIFFUSE_UNIFORM, config.texture.unit as i32);
    material.uniforms_mut().set(TINT_UNIFORM, Colorf::WHITE);

    let mut camera = cgl::Camera::new(Mat4f::IDENTITY);
    camera.set_position(CAMERA_POS);
    camera.look_at(Vec3f::ZERO);
    let mut renderer = cgl::Renderer::new(Rc::clone(&ctx), camera);
    renderer.set_clear_color(config.clear_color);

    let placements = [
      (vec3(-0.9, 0.0, 0.0), Vec3f::UP, Colorf::WHITE),
      (vec3(0.9, 0.0, 0.0), vec3(1.0, 1.0, 0.0), color(1.0, 0.85, 0.6, 1.0)),
    ];
    let mut models = Vec::with_capacity(placements.len());
    for &(position, rotation_axis, tint) in placements.iter() {
      let mut model = cgl::Model::new(Rc::clone(&ctx), Rc::clone(&material), &meshes[0])?;
      model.set_transform(cgl::Transform { position, rotation_axis, ..Default::default() });
      model.uniforms_mut().set(TINT_UNIFORM, tint);
      models.push(renderer.add_model(model)?);
    }

    Ok(Self { renderer, models, meshes, current_mesh: 0, wireframe: false, fov: config.fov })
  }

  fn reset_viewport(&mut self, window: &Window) {
    let (w, h) = window.drawable_size();
    self.renderer.ctx().set_viewport(vec2(0, 0), vec2(w as i32, h as i32));
    let aspect = w as f32 / h.max(1) as f32;
    self
      .renderer
      .camera_mut()
      .set_projection_matrix(Mat4f::perspective_rh_no(radians(self.fov), aspect, NEAR_PLANE, FAR_PLANE));
  }

  fn update(&mut self, delta: Duration) {
    let angle = ROTATION_SPEED * delta.as_secs_f32();
    for &handle in &self.models {
      if let Some(model) = self.renderer.model_mut(handle) {
        let transform = model.transform_mut();
        transform.rotation_angle = (transform.rotation_angle + angle) % f32::consts::TAU;
      }
    }
  }

  fn on_key_down(&mut self, scancode: Scancode, repeat: bool) -> AnyResult<()> {
    match scancode {
      Scancode::Space if !repeat => {
        self.current_mesh = (self.current_mesh + 1) % self.meshes.len();
        let mesh = &self.meshes[self.current_mesh];
        for &handle in &self.models {
          if let Some(model) = self.renderer.model_mut(handle) {
            model.set_vertex_data(mesh)?;
          }
        }
        info!("Switched to mesh #{}", self.current_mesh);
      }

      Scancode::W if !repeat => {
        self.wireframe = !self.wireframe;
        let mode = if self.wireframe { cgl::PolygonMode::Line } else { cgl::PolygonMode::Fill };
        self.for_each_vertex_array(|vertex_array| vertex_array.set_polygon_mode(mode));
      }

      // one triangle at a time
      Scancode::Up => self.for_each_vertex_array(|vertex_array| {
        let range = vertex_array.index_range();
        vertex_array.set_indices_count(range.count() + 3);
      }),
      Scancode::Down => self.for_each_vertex_array(|vertex_array| {
        let range = vertex_array.index_range();
        vertex_array.set_indices_count(range.count().saturating_sub(3).max(3));
      }),
      Scancode::Right => self.for_each_vertex_array(|vertex_array| {
        let range = vertex_array.index_range();
        vertex_array.set_indices_offset(range.offset() + 3);
      }),
      Scancode::Left => self.for_each_vertex_array(|vertex_array| {
        let range = vertex_array.index_range();
        vertex_array.set_indices_offset(range.offset().saturating_sub(3));
      }),

      _ => {}
    }
    Ok(())
  }

  fn for_each_vertex_array(&mut self, mut f: impl FnMut(&mut cgl::VertexArray)) {
    for &handle in &self.models {
      if let Some(model) = self.renderer.model_mut(handle) {
        f(model.vertex_array_mut());
      }
    }
  }
}
