mod instrument;
mod side;

pub use instrument::{
    INSTRUMENT_SIGIL, InstrumentDescriptor, InstrumentError, OptionKind, is_option_instrument,
    parse_instrument, strip_sigil,
};
pub use side::Side;
