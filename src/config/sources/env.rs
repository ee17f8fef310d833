//! Environment source: WINRING__SECTION__KEY, e.g. WINRING__RELOCATION__SETTLE_DELAY_MS=50

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("WINRING")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
