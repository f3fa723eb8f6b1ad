//! Sample arithmetic used to reconstruct predicted pictures: averaging two
//! motion-compensated predictions and adding signed residuals on top.

pub mod blend;
