mod build_paths;
mod resolve_path;

pub use build_paths::BuildPaths;
pub use resolve_path::ResolvePath;
