use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::record::Record;

/// Shown in place of a party that has no NIT.
pub const UNKNOWN_PARTY: &str = "UNKNOWN_PARTY";

/// Field names of a [Tercero], as they appear on the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TerceroField {
    Nit,
    Div,
    NumeroDeIdentificacion,
    TipoDeDocumento,
    TipoDeContribuyente,
    PrimerApellido,
    SegundoApellido,
    PrimerNombre,
    OtrosNombres,
    RazonSocial,
    NombreComercial,
    NombreCompleto,
    DireccionPrincipal,
    CorreoElectronico,
    #[strum(serialize = "telefono_1")]
    Telefono1,
    #[strum(serialize = "telefono_2")]
    Telefono2,
    CodigoPostal,
    CiudadMunicipio,
    Departamento,
    Pais,
}

/// The name parts joined into `nombre_completo`, in order.
pub const NAME_PART_FIELDS: [TerceroField; 5] = [
    TerceroField::RazonSocial,
    TerceroField::PrimerApellido,
    TerceroField::SegundoApellido,
    TerceroField::PrimerNombre,
    TerceroField::OtrosNombres,
];

/// A third party registered with the DIAN.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tercero {
    pub nit: String,
    pub div: Option<String>,
    pub numero_de_identificacion: Option<String>,
    pub tipo_de_documento: Option<String>,
    pub tipo_de_contribuyente: Option<String>,
    pub primer_apellido: Option<String>,
    pub segundo_apellido: Option<String>,
    pub primer_nombre: Option<String>,
    pub otros_nombres: Option<String>,
    pub razon_social: Option<String>,
    pub nombre_comercial: Option<String>,
    pub nombre_completo: Option<String>,
    pub direccion_principal: Option<String>,
    pub correo_electronico: Option<String>,
    pub telefono_1: Option<String>,
    pub telefono_2: Option<String>,
    pub codigo_postal: Option<String>,
    pub ciudad_municipio: Option<String>,
    pub departamento: Option<String>,
    pub pais: Option<String>,
}

impl Tercero {
    pub fn new(nit: impl Into<String>) -> Self {
        Self {
            nit: nit.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: TerceroField) -> Option<&str> {
        match field {
            TerceroField::Nit => Some(self.nit.as_str()),
            _ => self.optional_slot(field)?.as_deref(),
        }
    }

    /// Empty values are stored as `None`, except for the NIT.
    pub fn set(&mut self, field: TerceroField, value: String) {
        match field {
            TerceroField::Nit => self.nit = value,
            _ => {
                if let Some(slot) = self.optional_slot_mut(field) {
                    *slot = Some(value).filter(|v| !v.is_empty());
                }
            }
        }
    }

    /// `"<nit>: <nombre completo>"`, as used to identify the party in reports.
    pub fn party_label(&self) -> String {
        party_label(Some(&self.nit), self.nombre_completo.as_deref())
    }

    fn optional_slot(&self, field: TerceroField) -> Option<&Option<String>> {
        let slot = match field {
            TerceroField::Nit => return None,
            TerceroField::Div => &self.div,
            TerceroField::NumeroDeIdentificacion => &self.numero_de_identificacion,
            TerceroField::TipoDeDocumento => &self.tipo_de_documento,
            TerceroField::TipoDeContribuyente => &self.tipo_de_contribuyente,
            TerceroField::PrimerApellido => &self.primer_apellido,
            TerceroField::SegundoApellido => &self.segundo_apellido,
            TerceroField::PrimerNombre => &self.primer_nombre,
            TerceroField::OtrosNombres => &self.otros_nombres,
            TerceroField::RazonSocial => &self.razon_social,
            TerceroField::NombreComercial => &self.nombre_comercial,
            TerceroField::NombreCompleto => &self.nombre_completo,
            TerceroField::DireccionPrincipal => &self.direccion_principal,
            TerceroField::CorreoElectronico => &self.correo_electronico,
            TerceroField::Telefono1 => &self.telefono_1,
            TerceroField::Telefono2 => &self.telefono_2,
            TerceroField::CodigoPostal => &self.codigo_postal,
            TerceroField::CiudadMunicipio => &self.ciudad_municipio,
            TerceroField::Departamento => &self.departamento,
            TerceroField::Pais => &self.pais,
        };
        Some(slot)
    }

    fn optional_slot_mut(&mut self, field: TerceroField) -> Option<&mut Option<String>> {
        let slot = match field {
            TerceroField::Nit => return None,
            TerceroField::Div => &mut self.div,
            TerceroField::NumeroDeIdentificacion => &mut self.numero_de_identificacion,
            TerceroField::TipoDeDocumento => &mut self.tipo_de_documento,
            TerceroField::TipoDeContribuyente => &mut self.tipo_de_contribuyente,
            TerceroField::PrimerApellido => &mut self.primer_apellido,
            TerceroField::SegundoApellido => &mut self.segundo_apellido,
            TerceroField::PrimerNombre => &mut self.primer_nombre,
            TerceroField::OtrosNombres => &mut self.otros_nombres,
            TerceroField::RazonSocial => &mut self.razon_social,
            TerceroField::NombreComercial => &mut self.nombre_comercial,
            TerceroField::NombreCompleto => &mut self.nombre_completo,
            TerceroField::DireccionPrincipal => &mut self.direccion_principal,
            TerceroField::CorreoElectronico => &mut self.correo_electronico,
            TerceroField::Telefono1 => &mut self.telefono_1,
            TerceroField::Telefono2 => &mut self.telefono_2,
            TerceroField::CodigoPostal => &mut self.codigo_postal,
            TerceroField::CiudadMunicipio => &mut self.ciudad_municipio,
            TerceroField::Departamento => &mut self.departamento,
            TerceroField::Pais => &mut self.pais,
        };
        Some(slot)
    }
}

impl Record for Tercero {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let field = TerceroField::from_str(name).ok()?;
        self.get(field).map(Cow::Borrowed)
    }

    fn set_field(&mut self, name: &str, value: String) {
        if let Ok(field) = TerceroField::from_str(name) {
            self.set(field, value);
        }
    }
}

/// Identifies a party by NIT and full name. A party without a NIT is [UNKNOWN_PARTY].
pub fn party_label(nit: Option<&str>, nombre_completo: Option<&str>) -> String {
    match nit {
        None | Some("") => UNKNOWN_PARTY.to_string(),
        Some(nit) => format!("{}: {}", nit, nombre_completo.unwrap_or_default()),
    }
}
