use std::path::{Component, Path, PathBuf};

/// Absolute form of `path` for messages. Falls back to a lexically normalized
/// path when it cannot be canonicalized, e.g. because it does not exist.
fn best_effort_path_display(path: &Path) -> String {
    if let Ok(canonical) = path.canonicalize() {
        return canonical.display().to_string();
    }

    let absolute = match std::env::current_dir() {
        Ok(current_dir) if path.is_relative() => current_dir.join(path),
        _ => path.to_path_buf(),
    };
    lexically_normalize(&absolute).display().to_string()
}

fn lexically_normalize(path: &Path) -> PathBuf {
    path.components()
        .fold(Vec::new(), |mut components, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(components.last(), Some(Component::Normal(_))) {
                        components.pop();
                    }
                }
                other => components.push(other),
            }
            components
        })
        .iter()
        .collect()
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<P: AsRef<Path> + ?Sized> BestEffortPathExt for P {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self.as_ref())
    }
}
