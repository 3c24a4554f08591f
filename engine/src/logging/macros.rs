// Scoped logging: each scope can be raised or lowered independently through
// the variable passed to `init_logging`, e.g. "warn,gait=debug,motion=trace".

#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {
        let log_config = $crate::logging::get_log_config();
        if log_config.should_log($scope, $crate::logging::Level::$level) {
            tracing::event!($crate::logging::Level::$level, scope = $scope, $($arg)*);
        }
    };
}

/// Arm-swing estimation: baselines, power, gait axis
#[macro_export]
macro_rules! gait_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "gait", $($arg)*);
    };
}

/// Target velocity, jump and respawn
#[macro_export]
macro_rules! motion_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "motion", $($arg)*);
    };
}

#[macro_export]
macro_rules! physics_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "physics", $($arg)*);
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "input", $($arg)*);
    };
}

/// Trigger volume callbacks
#[macro_export]
macro_rules! event_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "event", $($arg)*);
    };
}
