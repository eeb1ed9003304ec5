use vision_catalog::{RegistryConfig, TransformRegistry};

fn main() {
    // Lists the default operations, then the optional ones with a marker.
    let registry = TransformRegistry::new();
    for name in registry.list_operations() {
        println!("{name}");
    }
    let all = TransformRegistry::with_config(RegistryConfig::all_operations());
    for op in all.operations().iter().filter(|op| !registry.contains(**op)) {
        println!("{op} (optional)");
    }
}
