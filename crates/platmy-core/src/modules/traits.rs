use crate::domain::{BridgeResult, ChemistryResult, PlatmyResult};
use crate::modules::spectrum::{PlotRequest, RawSpectrum, TransmissionInput};

/// Equilibrium chemistry for one pressure/temperature profile.
pub trait EquilibriumChemistry {
    fn equilibrium_abundances(
        &self,
        pressure: &[f64],
        temperature: &[f64],
    ) -> BridgeResult<ChemistryResult>;
}

/// Radiative transfer engine producing a transmission spectrum.
pub trait SpectrumEngine {
    fn compute_transmission_spectrum(
        &self,
        input: &TransmissionInput<'_>,
    ) -> PlatmyResult<RawSpectrum>;
}

/// Renders a spectrum to an image file.
pub trait SpectrumPlotter {
    fn plot_spectrum(&self, request: &PlotRequest<'_>) -> PlatmyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::EquilibriumChemistry;
    use crate::domain::{BridgeResult, ChemistryResult, PlatmyError, PlatmyErrorCategory};

    struct FailingChemistry;

    impl EquilibriumChemistry for FailingChemistry {
        fn equilibrium_abundances(
            &self,
            _pressure: &[f64],
            _temperature: &[f64],
        ) -> BridgeResult<ChemistryResult> {
            Err(PlatmyError::execution(
                "EXEC.SOLVER_STATUS",
                "chemistry solver failed with exit code 1",
            ))
        }
    }

    #[test]
    fn chemistry_trait_objects_share_error_types() {
        let chemistry: &dyn EquilibriumChemistry = &FailingChemistry;
        let error = chemistry
            .equilibrium_abundances(&[1.0], &[300.0])
            .expect_err("chemistry should fail");

        assert_eq!(error.category(), PlatmyErrorCategory::ExecutionError);
        assert_eq!(error.exit_code(), 4);
        assert_eq!(error.code(), "EXEC.SOLVER_STATUS");
    }
}
