//! WASM bindings for the promptdock overlay widget.
//!
//! Exposes a single `PromptDock` handle for JavaScript hosts such as an
//! extension content script or a bookmarklet loader.

mod dock;

pub use dock::*;

use wasm_bindgen::prelude::*;

/// Initialize the panic hook and console tracing.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        // A host page may have installed its own subscriber already; losing
        // that race only costs us log output.
        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
}
