//! Per-model parameter tables for the per-attribute families.
//!
//! These are data, not logic: number, display name, factory default and the
//! record flag, transcribed from the published parameter listings. Display
//! parameters (output frequency, bus voltage, fault codes) carry
//! `record: false` and are never written to a snapshot.

pub struct ParamSpec {
    pub number: u16,
    pub name: &'static str,
    pub default: &'static str,
    pub record: bool,
}

const fn p(number: u16, name: &'static str, default: &'static str, record: bool) -> ParamSpec {
    ParamSpec {
        number,
        name,
        default,
        record,
    }
}

pub static POWERFLEX_525: &[ParamSpec] = &[
    // Basic display group (read-only)
    p(1, "Output Freq", "0", false),
    p(2, "Commanded Freq", "0", false),
    p(3, "Output Current", "0", false),
    p(4, "Output Voltage", "0", false),
    p(5, "DC Bus Voltage", "0", false),
    p(6, "Drive Status", "0000000000000000", false),
    p(7, "Fault 1 Code", "0", false),
    p(8, "Fault 2 Code", "0", false),
    p(9, "Fault 3 Code", "0", false),
    p(10, "Process Display", "0", false),
    // Basic program group
    p(30, "Language", "1", true),
    p(31, "Motor NP Volts", "480", true),
    p(32, "Motor NP Hertz", "60", true),
    p(33, "Motor OL Current", "11", true),
    p(34, "Motor NP FLA", "10", true),
    p(35, "Motor NP Poles", "4", true),
    p(36, "Motor NP RPM", "1750", true),
    p(37, "Motor NP Power", "75", true),
    p(38, "Voltage Class", "2", true),
    p(39, "Torque Perf Mode", "1", true),
    p(40, "Autotune", "0", true),
    p(41, "Accel Time 1", "100", true),
    p(42, "Decel Time 1", "100", true),
    p(43, "Minimum Freq", "0", true),
    p(44, "Maximum Freq", "60", true),
    p(45, "Stop Mode", "0", true),
    p(46, "Start Source 1", "1", true),
    p(47, "Speed Reference1", "1", true),
    p(48, "Start Source 2", "2", true),
    p(49, "Speed Reference2", "5", true),
    p(50, "Start Source 3", "3", true),
    p(51, "Speed Reference3", "6", true),
    p(52, "Average kWh Cost", "0", true),
    p(53, "Reset To Defalts", "0", false),
    // Terminal block group
    p(62, "DigIn TermBlk 02", "48", true),
    p(63, "DigIn TermBlk 03", "50", true),
    p(64, "2-Wire Mode", "0", true),
    p(65, "DigIn TermBlk 05", "7", true),
    p(66, "DigIn TermBlk 06", "49", true),
    p(67, "DigIn TermBlk 07", "51", true),
    p(68, "DigIn TermBlk 08", "52", true),
    p(69, "Opto Out1 Sel", "2", true),
    p(76, "Relay Out1 Sel", "0", true),
    p(81, "Relay Out2 Sel", "6", true),
    p(88, "Analog In V Lo", "0", true),
    p(89, "Analog In V Hi", "100", true),
    // Communications group
    p(103, "Comm Data Rate", "4", true),
    p(104, "Comm Node Addr", "100", true),
    p(105, "Comm Loss Action", "0", true),
    p(106, "Comm Loss Time", "50", true),
    p(107, "Comm Format", "0", true),
    // Advanced program group (subset)
    p(441, "PWM Frequency", "40", true),
    p(442, "Droop Hertz@FLA", "0", true),
    p(443, "Motor Fdbk Type", "0", true),
    p(444, "Encoder PPR", "1024", true),
    p(445, "Pulse In Scale", "70", true),
    p(447, "Var PWM Disable", "0", true),
];
