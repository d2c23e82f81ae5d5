#[cfg(test)]
mod common;

#[cfg(test)]
mod auth_tests;

#[cfg(test)]
mod access_tests;

#[cfg(test)]
mod user_tests;

#[cfg(test)]
mod course_tests;

#[cfg(test)]
mod assignment_tests;

#[cfg(test)]
mod attendance_tests;

#[cfg(test)]
mod memorization_tests;

#[cfg(test)]
mod event_tests;

#[cfg(test)]
mod parent_tests;
