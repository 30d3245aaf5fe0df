//! # idlgen testsuite
//!
//! Mounts the code generated by the build script so the integration tests
//! can compile against it.
//!
//! - [`generated`] holds the `shared` and `tutorial` programs
//! - [`embedded`] holds the `geometry` program, generated with the extra
//!   `embedded` namespace module and without server skeletons

macro_rules! artifacts {
    ($dir:literal => $($module:ident),+ $(,)?) => {
        $(
            #[allow(clippy::all, missing_docs)]
            pub mod $module {
                include!(concat!(env!("OUT_DIR"), $dir, stringify!($module), ".rs"));
            }
        )+
    };
}

/// Artifacts of the `shared` and `tutorial` programs.
pub mod generated {
    artifacts!("/" =>
        shared_types,
        shared_types_impl,
        shared_constants,
        shared_constants_impl,
        shared_service_service,
        shared_service_service_impl,
        shared_service_server_skeleton,
        tutorial_types,
        tutorial_types_impl,
        tutorial_constants,
        tutorial_constants_impl,
        calculator_service,
        calculator_service_impl,
        calculator_server_skeleton,
    );
}

/// Artifacts of the `geometry` program.
pub mod embedded {
    artifacts!("/embedded/" =>
        geometry_types,
        geometry_types_impl,
        geometry_constants,
        geometry_constants_impl,
        canvas_service,
        canvas_service_impl,
    );
}
