use gl_generator::{Api, DebugStructGenerator, Fallbacks, Profile, Registry, StructGenerator};
use std::env;
use std::fs::File;
use std::path::Path;

// Desktop GL 3.0 in the compatibility profile keeps the 2.0-era enums
// (GENERATE_MIPMAP, LUMINANCE, ...) next to the 3.0 entry points. The VAO
// extensions are listed explicitly so that 2.0 contexts can still load them.
const EXTENSIONS: &[&str] =
  &["GL_ARB_vertex_array_object", "GL_APPLE_vertex_array_object", "GL_KHR_debug"];

fn main() {
  let dest = env::var("OUT_DIR").unwrap();
  let mut file = File::create(&Path::new(&dest).join("bindings.rs")).unwrap();

  let registry =
    Registry::new(Api::Gl, (3, 0), Profile::Compatibility, Fallbacks::All, EXTENSIONS);

  if cfg!(feature = "debug_all_commands") {
    registry.write_bindings(DebugStructGenerator, &mut file)
  } else {
    registry.write_bindings(StructGenerator, &mut file)
  }
  .unwrap();
}
