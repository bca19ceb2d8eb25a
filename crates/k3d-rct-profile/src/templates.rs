//! Default preamble and postamble templates
//!
//! Templates are plain G-code with placeholders that are substituted right
//! before the toolpath is emitted:
//!
//! | Placeholder | Replaced with                                   |
//! |-------------|-------------------------------------------------|
//! | `$HOTTEMP`  | hotend temperature                              |
//! | `$BEDTEMP`  | bed temperature                                 |
//! | `$G29`      | `G29` when bed probing is enabled, else nothing |
//! | `$LA`       | firmware specific pressure advance command      |
//! | `$FLOW`     | flow percentage                                 |

pub const PLACEHOLDER_HOTEND_TEMP: &str = "$HOTTEMP";
pub const PLACEHOLDER_BED_TEMP: &str = "$BEDTEMP";
pub const PLACEHOLDER_BED_PROBE: &str = "$G29";
pub const PLACEHOLDER_PRESSURE_ADVANCE: &str = "$LA";
pub const PLACEHOLDER_FLOW: &str = "$FLOW";

/// All recognised placeholders.
pub const PLACEHOLDERS: [&str; 5] = [
    PLACEHOLDER_HOTEND_TEMP,
    PLACEHOLDER_BED_TEMP,
    PLACEHOLDER_BED_PROBE,
    PLACEHOLDER_PRESSURE_ADVANCE,
    PLACEHOLDER_FLOW,
];

pub const DEFAULT_START_GCODE: &str = "M190 S$BEDTEMP ; wait for bed
M109 S$HOTTEMP ; wait for hotend
G28 ; home all axes
$G29
$LA
M221 S$FLOW
G90 ; absolute positioning
G92 E0";

pub const DEFAULT_END_GCODE: &str = "M104 S0 ; hotend off
M140 S0 ; bed off
M106 S0 ; fan off
G91 ; relative positioning
G1 Z5 F600 ; lift nozzle
G90
M84 ; motors off";
